//! Provider configuration consumed by the backends and the router.
//! Built once at startup and never mutated afterwards.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub primary: PrimaryConfig,
    #[serde(default)]
    pub secondary: SecondaryConfig,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            primary: PrimaryConfig::default(),
            secondary: SecondaryConfig::default(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_request_timeout_secs() -> u64 { 120 }

/// Remote OpenAI-compatible provider. Enabled only when an API key is set.
#[derive(Debug, Deserialize)]
pub struct PrimaryConfig {
    pub api_key: Option<SecretString>,
    #[serde(default = "default_primary_model")]
    pub model: String,
    #[serde(default = "default_primary_base_url")]
    pub base_url: String,
}

impl Default for PrimaryConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_primary_model(),
            base_url: default_primary_base_url(),
        }
    }
}

fn default_primary_model()    -> String { "gpt-4o-mini".to_string() }
fn default_primary_base_url() -> String { "https://api.openai.com/v1".to_string() }

impl PrimaryConfig {
    /// The key, if one is present and not blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_ref()
            .map(|k| k.expose_secret().trim())
            .filter(|k| !k.is_empty())
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key().is_some()
    }
}

/// Local Ollama server. Always assumed reachable.
#[derive(Debug, Clone, Deserialize)]
pub struct SecondaryConfig {
    #[serde(default = "default_secondary_base_url")]
    pub base_url: String,
    #[serde(default = "default_secondary_model")]
    pub model: String,
}

impl Default for SecondaryConfig {
    fn default() -> Self {
        Self {
            base_url: default_secondary_base_url(),
            model: default_secondary_model(),
        }
    }
}

fn default_secondary_base_url() -> String { "http://localhost:11434".to_string() }
fn default_secondary_model()    -> String { "llama3.2".to_string() }
