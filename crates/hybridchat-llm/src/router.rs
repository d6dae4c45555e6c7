//! LLM router — serves a conversation from the primary backend and falls
//! back to the secondary once when the primary failure is environmental.
//!
//! The decision is a small state machine:
//!
//! ```text
//! Sanitizing ─► PrimaryAttempt ─► Done
//!     │               │
//!     │               ▼
//!     │         ClassifyFailure ─► Failed
//!     │               │
//!     ▼               ▼
//!  SecondaryAttempt ◄─┘ ─► Done | Failed
//! ```
//!
//! Each request makes at most one primary and one secondary call, in order.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::audit::LlmAuditEntry;
use crate::backend::{build_http_client, LlmBackend, LlmError, OllamaBackend, OpenAiBackend};
use crate::classification::is_fallback_worthy;
use crate::config::LlmConfig;
use crate::message::{sanitize_messages, Conversation, InvalidInput};

pub const NOTE_PRIMARY_NOT_CONFIGURED: &str = "primary not configured; served by secondary.";
pub const NOTE_FELL_BACK: &str = "fell back due to primary failure/quota.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderRole {
    Primary,
    Secondary,
}

impl ProviderRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderRole::Primary   => "primary",
            ProviderRole::Secondary => "secondary",
        }
    }
}

/// Reply envelope returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderResult {
    pub text: String,
    pub provider: ProviderRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Why a request is being served by the secondary backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    PrimaryNotConfigured,
    PrimaryFailed,
}

impl FallbackReason {
    pub fn note(&self) -> &'static str {
        match self {
            FallbackReason::PrimaryNotConfigured => NOTE_PRIMARY_NOT_CONFIGURED,
            FallbackReason::PrimaryFailed        => NOTE_FELL_BACK,
        }
    }

    /// True when the primary was tried and failed.
    pub fn fell_back(&self) -> bool {
        matches!(self, FallbackReason::PrimaryFailed)
    }
}

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),
    #[error("{} provider failed: {message}", .provider.as_str())]
    Upstream { provider: ProviderRole, message: String },
}

enum RouteState<'a> {
    Sanitizing,
    PrimaryAttempt { backend: &'a dyn LlmBackend, conversation: Conversation },
    ClassifyFailure { conversation: Conversation, error: LlmError },
    SecondaryAttempt { conversation: Conversation, reason: FallbackReason },
    Done(ProviderResult),
    Failed(RouteError),
}

/// Routes chat requests across the primary and secondary backends.
pub struct LlmRouter {
    primary: Option<Arc<dyn LlmBackend>>,
    secondary: Arc<dyn LlmBackend>,
}

impl LlmRouter {
    pub fn new(primary: Option<Arc<dyn LlmBackend>>, secondary: Arc<dyn LlmBackend>) -> Self {
        Self { primary, secondary }
    }

    /// Build both backends from configuration. The primary is only created
    /// when an API key is present.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let client = build_http_client(Duration::from_secs(config.request_timeout_secs))?;

        let primary = config.primary.api_key().map(|key| {
            Arc::new(
                OpenAiBackend::new(key, config.primary.model.clone())
                    .with_base_url(config.primary.base_url.clone())
                    .with_client(client.clone()),
            ) as Arc<dyn LlmBackend>
        });
        let secondary = Arc::new(
            OllamaBackend::new(config.secondary.base_url.clone(), config.secondary.model.clone())
                .with_client(client),
        );

        Ok(Self::new(primary, secondary))
    }

    pub fn primary_configured(&self) -> bool {
        self.primary.is_some()
    }

    pub fn primary(&self) -> Option<&Arc<dyn LlmBackend>> {
        self.primary.as_ref()
    }

    pub fn secondary(&self) -> &Arc<dyn LlmBackend> {
        &self.secondary
    }

    /// Sanitize `raw` and serve it, falling back at most once.
    pub async fn route(&self, raw: Option<&Value>) -> Result<ProviderResult, RouteError> {
        let started = Instant::now();
        let mut state = RouteState::Sanitizing;

        loop {
            state = match state {
                RouteState::Sanitizing => match sanitize_messages(raw) {
                    Err(e) => RouteState::Failed(e.into()),
                    Ok(conversation) => match &self.primary {
                        Some(backend) => RouteState::PrimaryAttempt {
                            backend: backend.as_ref(),
                            conversation,
                        },
                        None => {
                            info!("Primary not configured, routing to secondary");
                            RouteState::SecondaryAttempt {
                                conversation,
                                reason: FallbackReason::PrimaryNotConfigured,
                            }
                        }
                    },
                },

                RouteState::PrimaryAttempt { backend, conversation } => {
                    match backend.complete(&conversation).await {
                        Ok(resp) => {
                            LlmAuditEntry::new(
                                ProviderRole::Primary,
                                backend.name(),
                                &resp.model,
                                false,
                                &resp.content,
                                elapsed_ms(started),
                            )
                            .emit();
                            RouteState::Done(ProviderResult {
                                text: resp.content,
                                provider: ProviderRole::Primary,
                                note: None,
                            })
                        }
                        Err(error) => RouteState::ClassifyFailure { conversation, error },
                    }
                }

                RouteState::ClassifyFailure { conversation, error } => {
                    warn!(status = ?error.status(), error = %error, "Primary failed, checking fallback");
                    if is_fallback_worthy(&error) {
                        RouteState::SecondaryAttempt { conversation, reason: FallbackReason::PrimaryFailed }
                    } else {
                        error!(error = %error, "Primary failure is not fallback-worthy");
                        RouteState::Failed(RouteError::Upstream {
                            provider: ProviderRole::Primary,
                            message: error.to_string(),
                        })
                    }
                }

                RouteState::SecondaryAttempt { conversation, reason } => {
                    match self.secondary.complete(&conversation).await {
                        Ok(resp) => {
                            LlmAuditEntry::new(
                                ProviderRole::Secondary,
                                self.secondary.name(),
                                &resp.model,
                                reason.fell_back(),
                                &resp.content,
                                elapsed_ms(started),
                            )
                            .emit();
                            RouteState::Done(ProviderResult {
                                text: resp.content,
                                provider: ProviderRole::Secondary,
                                note: Some(reason.note().to_string()),
                            })
                        }
                        Err(e) => {
                            error!(error = %e, "Secondary failed");
                            RouteState::Failed(RouteError::Upstream {
                                provider: ProviderRole::Secondary,
                                message: e.to_string(),
                            })
                        }
                    }
                }

                RouteState::Done(result) => return Ok(result),
                RouteState::Failed(err) => return Err(err),
            };
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
