//! Shared application state for the web server.

use std::sync::Arc;

use hybridchat_llm::LlmRouter;

/// Read-only state injected into every Axum handler.
pub struct AppState {
    pub llm: LlmRouter,
    pub secondary_base_url: String,
}

impl AppState {
    pub fn new(llm: LlmRouter, secondary_base_url: impl Into<String>) -> Self {
        Self { llm, secondary_base_url: secondary_base_url.into() }
    }
}

pub type SharedState = Arc<AppState>;
