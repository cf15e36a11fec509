//! Model and tracing configuration.
//!
//! Prompt templates carry their model configuration as a free-form JSON
//! blob. [`ModelConfig`] is the typed, validated view of that blob: exactly
//! a model identifier and a temperature in `[0.0, 1.0]`.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::time::Duration;

use crate::errors::ValidationError;

/// Validated model configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawModelConfig")]
pub struct ModelConfig {
    /// Model identifier understood by the inference endpoint.
    #[serde(rename = "model")]
    pub model_id: String,
    /// Sampling temperature.
    pub temperature: f64,
}

#[derive(Deserialize)]
struct RawModelConfig {
    model: String,
    temperature: f64,
}

impl TryFrom<RawModelConfig> for ModelConfig {
    type Error = ValidationError;

    fn try_from(raw: RawModelConfig) -> Result<Self, Self::Error> {
        Self::new(raw.model, raw.temperature)
    }
}

impl ModelConfig {
    /// Lowest accepted temperature.
    pub const MIN_TEMPERATURE: f64 = 0.0;
    /// Highest accepted temperature.
    pub const MAX_TEMPERATURE: f64 = 1.0;

    /// Create a validated configuration.
    pub fn new(model_id: impl Into<String>, temperature: f64) -> Result<Self, ValidationError> {
        let model_id = model_id.into();
        if model_id.trim().is_empty() {
            return Err(ValidationError::field("model", "model identifier cannot be empty"));
        }
        if !temperature.is_finite()
            || !(Self::MIN_TEMPERATURE..=Self::MAX_TEMPERATURE).contains(&temperature)
        {
            return Err(ValidationError::field(
                "temperature",
                format!("must be within [0.0, 1.0], got {}", temperature),
            ));
        }
        Ok(Self {
            model_id,
            temperature,
        })
    }

    /// Extract a configuration from a prompt template's config blob.
    ///
    /// ```rust
    /// use promptrail_core::ModelConfig;
    ///
    /// let blob = serde_json::json!({"model": "m1", "temperature": 1});
    /// let config = ModelConfig::from_json(&blob).unwrap();
    /// assert_eq!(config.temperature, 1.0);
    /// ```
    pub fn from_json(value: &JsonValue) -> Result<Self, ValidationError> {
        let model = value
            .get("model")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| ValidationError::field("model", "missing or not a string"))?;
        let temperature = value
            .get("temperature")
            .and_then(JsonValue::as_f64)
            .ok_or_else(|| ValidationError::field("temperature", "missing or not a number"))?;
        Self::new(model, temperature)
    }

    /// Serialize to the JSON shape stored alongside prompt templates.
    pub fn to_json(&self) -> JsonValue {
        serde_json::json!({
            "model": self.model_id,
            "temperature": self.temperature,
        })
    }
}

/// Tracing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TracingSettings {
    /// Whether observations are recorded and shipped.
    pub enabled: bool,
}

impl Default for TracingSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl TracingSettings {
    /// Tracing turned off.
    #[must_use]
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    /// Parse an on/off flag such as an environment variable value.
    ///
    /// Anything other than a recognised "off" spelling enables tracing.
    #[must_use]
    pub fn from_flag(value: &str) -> Self {
        let enabled = !matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "0" | "false" | "no" | "off"
        );
        Self { enabled }
    }
}

/// Connection settings for a Langfuse project.
///
/// Shared by the prompt store client and the trace collector.
#[derive(Clone, PartialEq, Eq)]
pub struct LangfuseConfig {
    /// Project public key (basic auth user).
    pub public_key: String,
    /// Project secret key (basic auth password).
    pub secret_key: String,
    /// Base URL without trailing slash.
    pub host: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl std::fmt::Debug for LangfuseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LangfuseConfig")
            .field("public_key", &self.public_key)
            .field("secret_key", &"<redacted>")
            .field("host", &self.host)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl LangfuseConfig {
    /// Default cloud host.
    pub const DEFAULT_HOST: &'static str = "https://cloud.langfuse.com";

    /// Create a configuration for the default host.
    pub fn new(public_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            secret_key: secret_key.into(),
            host: Self::DEFAULT_HOST.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Set the host. A trailing slash is stripped.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build an absolute API URL from a path starting with `/`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.host, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_model_config_valid() {
        let config = ModelConfig::new("m1", 0.5).unwrap();
        assert_eq!(config.model_id, "m1");
        assert_eq!(config.temperature, 0.5);
    }

    #[rstest]
    #[case("", 0.5, "model")]
    #[case("m1", -0.1, "temperature")]
    #[case("m1", 1.01, "temperature")]
    #[case("m1", f64::NAN, "temperature")]
    fn test_model_config_invalid(#[case] model: &str, #[case] temp: f64, #[case] field: &str) {
        let err = ModelConfig::new(model, temp).unwrap_err();
        assert_eq!(err.field.as_deref(), Some(field));
    }

    #[test]
    fn test_model_config_serde_shape() {
        let config = ModelConfig::new("m1", 0.5).unwrap();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json, serde_json::json!({"model": "m1", "temperature": 0.5}));
        assert_eq!(json, config.to_json());

        let back: ModelConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_model_config_deserialize_rejects_out_of_range() {
        let result: Result<ModelConfig, _> =
            serde_json::from_value(serde_json::json!({"model": "m1", "temperature": 3.0}));
        assert!(result.is_err());
    }

    #[test]
    fn test_from_json_missing_fields() {
        let err = ModelConfig::from_json(&serde_json::json!({"temperature": 0.1})).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("model"));

        let err = ModelConfig::from_json(&serde_json::json!({"model": "m1"})).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("temperature"));
    }

    #[test]
    fn test_langfuse_config() {
        let config = LangfuseConfig::new("pk", "sk").with_host("http://localhost:3000/");
        assert_eq!(config.url("/api/public/ingestion"), "http://localhost:3000/api/public/ingestion");
        assert!(!format!("{:?}", config).contains("sk\""));
    }

    #[rstest]
    #[case("true", true)]
    #[case("1", true)]
    #[case("", true)]
    #[case("false", false)]
    #[case("OFF", false)]
    #[case(" 0 ", false)]
    fn test_tracing_flag(#[case] value: &str, #[case] enabled: bool) {
        assert_eq!(TracingSettings::from_flag(value).enabled, enabled);
    }
}
