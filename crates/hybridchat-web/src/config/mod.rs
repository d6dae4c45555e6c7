//! Configuration loading for hybridchat.
//! Reads hybridchat.toml from the current directory or the path in the
//! HYBRIDCHAT_CONFIG env var, then applies environment overrides. A `.env`
//! file is honoured when present.

use anyhow::Context;
use hybridchat_llm::LlmConfig;
use secrecy::SecretString;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Browser origin allowed by CORS. `None` or `"*"` allows any origin.
    #[serde(default = "default_cors_origin")]
    pub cors_origin: Option<String>,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

fn default_host()        -> String         { "0.0.0.0".to_string() }
fn default_port()        -> u16            { 8080 }
fn default_cors_origin() -> Option<String> { Some("http://localhost:5173".to_string()) }
fn default_body_limit()  -> usize          { 1024 * 1024 }

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

mod tests;

impl Config {
    /// Load configuration: `.env`, then the TOML file (if any), then
    /// process environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(e).context("failed to read .env");
            }
        }

        let path = std::env::var("HYBRIDCHAT_CONFIG")
            .unwrap_or_else(|_| "hybridchat.toml".to_string());
        let mut config = Self::from_file(Path::new(&path))?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("invalid config in {}", path.display()))
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply environment overrides using `lookup` to read variables.
    pub fn apply_env<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string());
        let non_empty = |key: &str| var(key).filter(|v| !v.is_empty());

        if let Some(key) = var("OPENAI_API_KEY") {
            self.llm.primary.api_key = if key.is_empty() {
                None
            } else {
                Some(SecretString::from(key))
            };
        }
        if let Some(model) = non_empty("OPENAI_MODEL") {
            self.llm.primary.model = model;
        }
        if let Some(url) = non_empty("OPENAI_BASE_URL") {
            self.llm.primary.base_url = url;
        }
        if let Some(url) = non_empty("OLLAMA_BASE_URL") {
            self.llm.secondary.base_url = url;
        }
        if let Some(model) = non_empty("OLLAMA_MODEL") {
            self.llm.secondary.model = model;
        }
        if let Some(secs) = non_empty("HYBRIDCHAT_REQUEST_TIMEOUT_SECS") {
            self.llm.request_timeout_secs = secs
                .parse()
                .with_context(|| format!("HYBRIDCHAT_REQUEST_TIMEOUT_SECS is not a number: {secs}"))?;
        }
        if let Some(port) = non_empty("PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("PORT is not a valid port: {port}"))?;
        }
        if let Some(host) = non_empty("HYBRIDCHAT_BIND") {
            self.server.host = host;
        }
        if let Some(origin) = var("HYBRIDCHAT_CORS_ORIGIN") {
            self.server.cors_origin = match origin.as_str() {
                "" | "*" => None,
                _ => Some(origin),
            };
        }
        Ok(())
    }
}
