#[cfg(test)]
mod tests {
    use super::super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_match_local_dev_setup() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.cors_origin.as_deref(), Some("http://localhost:5173"));
        assert_eq!(config.server.body_limit_bytes, 1024 * 1024);
        assert_eq!(config.server.bind_addr(), "0.0.0.0:8080");
        assert!(!config.llm.primary.is_enabled());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.llm.secondary.model, "llama3.2");
    }

    #[test]
    fn test_toml_sections_override_defaults() {
        let config = Config::from_toml(
            r#"
            [server]
            port = 9000

            [llm]
            request_timeout_secs = 30

            [llm.primary]
            api_key = "sk-from-file"
            model = "gpt-4o"

            [llm.secondary]
            base_url = "http://gpu-box:11434"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.llm.request_timeout_secs, 30);
        assert_eq!(config.llm.primary.api_key(), Some("sk-from-file"));
        assert_eq!(config.llm.primary.model, "gpt-4o");
        assert_eq!(config.llm.secondary.base_url, "http://gpu-box:11434");
        assert_eq!(config.llm.secondary.model, "llama3.2");
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = Config::from_file(Path::new("/definitely/not/here/hybridchat.toml")).unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_env_overrides_are_trimmed() {
        let mut config = Config::default();
        config
            .apply_env(env(&[
                ("OPENAI_API_KEY", "  sk-env \n"),
                ("OPENAI_MODEL", "gpt-4.1-mini"),
                ("OLLAMA_BASE_URL", " http://127.0.0.1:11434 "),
                ("OLLAMA_MODEL", "qwen2.5 "),
                ("PORT", "3000"),
            ]))
            .unwrap();
        assert_eq!(config.llm.primary.api_key(), Some("sk-env"));
        assert_eq!(config.llm.primary.model, "gpt-4.1-mini");
        assert_eq!(config.llm.secondary.base_url, "http://127.0.0.1:11434");
        assert_eq!(config.llm.secondary.model, "qwen2.5");
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_blank_env_key_disables_primary() {
        let mut config = Config::from_toml("[llm.primary]\napi_key = \"sk-file\"").unwrap();
        assert!(config.llm.primary.is_enabled());
        config.apply_env(env(&[("OPENAI_API_KEY", "   ")])).unwrap();
        assert!(!config.llm.primary.is_enabled());
    }

    #[test]
    fn test_blank_model_keeps_default() {
        let mut config = Config::default();
        config.apply_env(env(&[("OLLAMA_MODEL", "  ")])).unwrap();
        assert_eq!(config.llm.secondary.model, "llama3.2");
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        let mut config = Config::default();
        let err = config.apply_env(env(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_wildcard_cors_origin_means_any() {
        let mut config = Config::default();
        config.apply_env(env(&[("HYBRIDCHAT_CORS_ORIGIN", "*")])).unwrap();
        assert_eq!(config.server.cors_origin, None);
    }
}
