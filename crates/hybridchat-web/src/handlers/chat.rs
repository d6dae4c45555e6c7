//! Chat endpoint: routes the submitted conversation through the LLM router.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use hybridchat_llm::ProviderResult;
use serde_json::Value;
use crate::error::ApiError;
use crate::state::SharedState;

/// POST /api/chat — body `{ "messages": [{ "role", "content" }, ...] }`
pub async fn chat_submit(
    State(state): State<SharedState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ProviderResult>, ApiError> {
    let Json(body) = payload?;
    let result = state.llm.route(body.get("messages")).await?;
    Ok(Json(result))
}
