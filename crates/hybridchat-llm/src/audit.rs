//! Audit record for routed chat completions.
//! Emitted through `tracing` once per served reply; nothing is persisted.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::router::ProviderRole;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmAuditEntry {
    pub id: Uuid,
    pub provider: ProviderRole,
    pub backend: String,
    pub model: String,
    pub fell_back: bool,
    pub output_hash: String,
    pub latency_ms: u64,
    pub called_at: chrono::DateTime<Utc>,
}

impl LlmAuditEntry {
    pub fn new(
        provider: ProviderRole,
        backend: &str,
        model: &str,
        fell_back: bool,
        output: &str,
        latency_ms: u64,
    ) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(output.as_bytes());
        let output_hash = format!("{:x}", hasher.finalize());

        Self {
            id: Uuid::new_v4(),
            provider,
            backend: backend.to_string(),
            model: model.to_string(),
            fell_back,
            output_hash,
            latency_ms,
            called_at: Utc::now(),
        }
    }

    pub fn emit(&self) {
        tracing::info!(
            audit_id = %self.id,
            provider = self.provider.as_str(),
            backend = %self.backend,
            model = %self.model,
            fell_back = self.fell_back,
            output_hash = %self.output_hash,
            latency_ms = self.latency_ms,
            "chat completion served"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_hash_is_sha256_hex() {
        let entry = LlmAuditEntry::new(ProviderRole::Primary, "openai", "gpt-4o-mini", false, "hello", 12);
        assert_eq!(
            entry.output_hash,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
        assert_eq!(entry.provider, ProviderRole::Primary);
    }

    #[test]
    fn test_entries_get_distinct_ids() {
        let a = LlmAuditEntry::new(ProviderRole::Secondary, "ollama", "llama3.2", true, "x", 1);
        let b = LlmAuditEntry::new(ProviderRole::Secondary, "ollama", "llama3.2", true, "x", 1);
        assert_ne!(a.id, b.id);
        assert_eq!(a.output_hash, b.output_hash);
    }
}
