use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::analysis::embedding::ModelChoice;

/// Application configuration loaded from environment variables.
/// Every field has a default; startup fails only on malformed values.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub port: u16,
    pub rust_log: String,
    pub embedding_model: ModelChoice,
    pub model_cache_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub warm_up_model: bool,
    pub semantic_scoring: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
            rust_log: "info".to_string(),
            embedding_model: ModelChoice::default(),
            model_cache_dir: PathBuf::from(".fastembed_cache"),
            max_upload_bytes: 10 * 1024 * 1024,
            warm_up_model: true,
            semantic_scoring: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();

        Ok(Config {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            embedding_model: match std::env::var("EMBEDDING_MODEL") {
                Ok(name) => name
                    .parse::<ModelChoice>()
                    .map_err(anyhow::Error::msg)
                    .with_context(|| format!("EMBEDDING_MODEL '{name}' is not supported"))?,
                Err(_) => defaults.embedding_model,
            },
            model_cache_dir: std::env::var("MODEL_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_cache_dir),
            max_upload_bytes: optional_env("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            warm_up_model: optional_env("WARM_UP_MODEL", defaults.warm_up_model)?,
            semantic_scoring: optional_env("SEMANTIC_SCORING", defaults.semantic_scoring)?,
        })
    }
}

fn optional_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_local_tool_profile() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.bind_addr, "127.0.0.1");
        assert_eq!(config.max_upload_bytes, 10_485_760);
        assert_eq!(config.embedding_model, ModelChoice::AllMpnetBaseV2);
        assert!(config.semantic_scoring);
    }

    #[test]
    fn test_optional_env_falls_back_when_unset() {
        let value: usize = optional_env("FITCHECK_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_optional_env_rejects_garbage() {
        std::env::set_var("FITCHECK_TEST_BAD_BOOL", "maybe");
        let result: Result<bool> = optional_env("FITCHECK_TEST_BAD_BOOL", true);
        assert!(result.is_err());
        std::env::remove_var("FITCHECK_TEST_BAD_BOOL");
    }
}
