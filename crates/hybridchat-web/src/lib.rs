//! hybridchat-web — HTTP front for the hybrid chat gateway.
//! Exposes:
//!   - POST /api/chat  — route a conversation to the primary or local model
//!   - GET  /health    — provider configuration summary

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
