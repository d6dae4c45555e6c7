//! hybridchat-llm — chat provider abstraction and failover routing.
//! Holds the message sanitizer, the two provider backends, the
//! fallback classifier and the primary/secondary routing policy.

pub mod message;
pub mod backend;
pub mod classification;
pub mod config;
pub mod router;
pub mod audit;

pub use backend::{LlmBackend, LlmError, LlmResponse};
pub use config::LlmConfig;
pub use message::{Conversation, InvalidInput, Message, Role};
pub use router::{FallbackReason, LlmRouter, ProviderResult, ProviderRole, RouteError};
