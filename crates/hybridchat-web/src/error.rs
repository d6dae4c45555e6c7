//! API error type rendered as the `{ error, detail? }` failure envelope.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hybridchat_llm::{ProviderRole, RouteError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("messages must be a non-empty array")]
    InvalidInput(String),
    #[error("invalid JSON body")]
    InvalidJson(String),
    #[error("request body too large")]
    PayloadTooLarge(String),
    #[error("Primary request failed")]
    Primary(String),
    #[error("Secondary request failed")]
    Secondary(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) | ApiError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Primary(_) | ApiError::Secondary(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> &str {
        match self {
            ApiError::InvalidInput(d)
            | ApiError::InvalidJson(d)
            | ApiError::PayloadTooLarge(d)
            | ApiError::Primary(d)
            | ApiError::Secondary(d) => d,
        }
    }
}

impl From<RouteError> for ApiError {
    fn from(err: RouteError) -> Self {
        match err {
            RouteError::InvalidInput(e) => ApiError::InvalidInput(e.to_string()),
            RouteError::Upstream { provider: ProviderRole::Primary, message } => ApiError::Primary(message),
            RouteError::Upstream { provider: ProviderRole::Secondary, message } => ApiError::Secondary(message),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // The body limit surfaces as a buffering rejection carrying 413.
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(rejection.body_text())
        } else {
            ApiError::InvalidJson(rejection.body_text())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = self.detail();
        let body = ErrorBody {
            error: self.to_string(),
            detail: (!detail.is_empty()).then(|| detail.to_string()),
        };
        (self.status(), Json(body)).into_response()
    }
}
