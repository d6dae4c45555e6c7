//! Liveness plus a summary of which providers are configured.

use axum::{extract::State, Json};
use serde::Serialize;
use crate::state::SharedState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub ok: bool,
    pub primary_configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_model: Option<String>,
    pub secondary_base_url: String,
    pub secondary_model: String,
}

/// GET /health
pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let llm = &state.llm;
    Json(HealthResponse {
        ok: true,
        primary_configured: llm.primary_configured(),
        primary_model: llm.primary().map(|p| p.model_id().to_string()),
        secondary_base_url: state.secondary_base_url.clone(),
        secondary_model: llm.secondary().model_id().to_string(),
    })
}
