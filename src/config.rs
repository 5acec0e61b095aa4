// src/config.rs
//! Run configuration, loadable from TOML. Every field has a default, so an
//! empty file (or no file) is a valid configuration.

use crate::extractors::theorem::DEFAULT_REFERENCE_WINDOW;
use crate::utils::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_ORACLE_ENDPOINT: &str = "https://api.openai.com/v1";
pub const DEFAULT_ORACLE_MODEL: &str = "o3-mini-2025-01-31";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Cut each paper at its first appendix marker before extraction
    pub skip_appendix: bool,

    /// Characters searched on each side of a span when inferring its number
    pub reference_window: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            skip_appendix: true,
            reference_window: DEFAULT_REFERENCE_WINDOW,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Base URL of an OpenAI-compatible API
    pub endpoint: String,

    pub model: String,

    /// Injected by the caller; never written back out
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Extra attempts after the first one before rejecting a theorem
    pub max_retries: u32,

    /// Wall-clock limit for a single oracle call (seconds)
    pub timeout_secs: u64,

    /// Pause between attempts, multiplied by the attempt number (milliseconds)
    pub retry_backoff_ms: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ORACLE_ENDPOINT.to_string(),
            model: DEFAULT_ORACLE_MODEL.to_string(),
            api_key: None,
            max_retries: 5,
            timeout_secs: 120,
            retry_backoff_ms: 500,
        }
    }
}

impl OracleConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub extractor: ExtractorConfig,
    pub oracle: OracleConfig,
}

impl AppConfig {
    pub fn from_toml(toml_str: &str) -> Result<Self, AppError> {
        toml::from_str(toml_str)
            .map_err(|e| AppError::Config(format!("Failed to parse TOML: {}", e)))
    }

    pub fn to_toml(&self) -> Result<String, AppError> {
        toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(format!("Failed to serialize to TOML: {}", e)))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.extractor.reference_window == 0 {
            return Err(AppError::Config("reference_window must be greater than 0".to_string()));
        }
        if self.oracle.timeout_secs == 0 {
            return Err(AppError::Config("timeout_secs must be greater than 0".to_string()));
        }
        if self.oracle.model.trim().is_empty() {
            return Err(AppError::Config("model must not be empty".to_string()));
        }
        if self.oracle.endpoint.trim().is_empty() {
            return Err(AppError::Config("endpoint must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.extractor.skip_appendix);
        assert_eq!(config.extractor.reference_window, 1000);
        assert_eq!(config.oracle.max_attempts(), 6);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [oracle]
            model = "gpt-4o-mini"
            max_retries = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.oracle.model, "gpt-4o-mini");
        assert_eq!(config.oracle.max_attempts(), 3);
        assert_eq!(config.oracle.endpoint, DEFAULT_ORACLE_ENDPOINT);
        assert!(config.extractor.skip_appendix);
    }

    #[test]
    fn test_api_key_not_serialized() {
        let mut config = AppConfig::default();
        config.oracle = config.oracle.with_api_key("sk-secret");
        let toml_str = config.to_toml().unwrap();
        assert!(!toml_str.contains("sk-secret"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = AppConfig::default();
        config.extractor.reference_window = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.oracle.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.oracle.model = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[extractor]\nskip_appendix = false\n").unwrap();
        let config = AppConfig::load(&path).unwrap();
        assert!(!config.extractor.skip_appendix);
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        assert!(matches!(AppConfig::from_toml("oracle = 3"), Err(AppError::Config(_))));
    }
}
