//! HTTP handlers for all web routes.

pub mod chat;
pub mod health;
