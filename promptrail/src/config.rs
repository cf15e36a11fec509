//! Environment configuration.
//!
//! A `.env` file is loaded once, then every setting is read from the
//! process environment. Empty values count as unset.

use promptrail_core::{LangfuseConfig, PromptrailError, TracingSettings};
use promptrail_models::{AwsCredentials, BedrockConverseModel};
use promptrail_prompts::LangfusePromptStore;
use promptrail_tools::TavilyClient;
use promptrail_tracing::{LangfuseCollector, LogConfig, Tracer};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// What happened when looking for a `.env` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DotenvStatus {
    /// Settings were not loaded through [`Settings::load`].
    NotAttempted,
    /// No `.env` file was found.
    Missing,
    /// Loaded from this path.
    Loaded(PathBuf),
    /// A `.env` file exists but could not be read or parsed.
    Unreadable(String),
}

impl DotenvStatus {
    fn from_result(result: Result<PathBuf, dotenvy::Error>) -> Self {
        match result {
            Ok(path) => Self::Loaded(path),
            Err(e) if e.not_found() => Self::Missing,
            Err(e) => Self::Unreadable(e.to_string()),
        }
    }

    fn log(&self) {
        match self {
            Self::Loaded(path) => debug!(path = %path.display(), "Loaded .env"),
            Self::Unreadable(error) => warn!(error = %error, "Ignoring unreadable .env"),
            Self::NotAttempted | Self::Missing => {}
        }
    }
}

/// Settings for every external service.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Langfuse project, shared by the prompt store and the trace collector.
    pub langfuse: Option<LangfuseConfig>,
    /// Whether observations are shipped.
    pub tracing: TracingSettings,
    /// Tavily API key.
    pub tavily_api_key: Option<String>,
    /// AWS credentials for Bedrock.
    pub aws: Option<AwsCredentials>,
    /// AWS region for Bedrock.
    pub aws_region: String,
    /// Log subscriber settings.
    pub log: LogConfig,
    /// Outcome of the `.env` lookup, logged by [`Settings::init_logging`].
    pub dotenv: DotenvStatus,
}

impl Settings {
    /// Load `.env` if present, then read the environment.
    ///
    /// Nothing is logged yet; call [`Settings::init_logging`] next.
    pub fn load() -> Self {
        let dotenv = DotenvStatus::from_result(dotenvy::dotenv());
        Self {
            dotenv,
            ..Self::from_env()
        }
    }

    /// Install the log subscriber, then report the `.env` lookup.
    pub fn init_logging(&self) {
        promptrail_tracing::init_logging(&self.log);
        self.dotenv.log();
    }

    /// Read the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let langfuse = match (get("LANGFUSE_PUBLIC_KEY"), get("LANGFUSE_SECRET_KEY")) {
            (Some(public_key), Some(secret_key)) => {
                let config = LangfuseConfig::new(public_key, secret_key);
                Some(match get("LANGFUSE_HOST").or_else(|| get("LANGFUSE_BASE_URL")) {
                    Some(host) => config.with_host(host),
                    None => config,
                })
            }
            _ => None,
        };

        let tracing = get("LANGFUSE_TRACING_ENABLED")
            .map(|v| TracingSettings::from_flag(&v))
            .unwrap_or_default();

        let aws = match (get("AWS_ACCESS_KEY_ID"), get("AWS_SECRET_ACCESS_KEY")) {
            (Some(id), Some(secret)) => {
                let credentials = AwsCredentials::new(id, secret);
                Some(match get("AWS_SESSION_TOKEN") {
                    Some(token) => credentials.with_session_token(token),
                    None => credentials,
                })
            }
            _ => None,
        };

        let log = LogConfig {
            json_output: get("LOG_FORMAT").is_some_and(|v| v.eq_ignore_ascii_case("json")),
            ..LogConfig::default()
        };

        Self {
            langfuse,
            tracing,
            tavily_api_key: get("TAVILY_API_KEY"),
            aws,
            aws_region: get("AWS_REGION")
                .or_else(|| get("AWS_DEFAULT_REGION"))
                .unwrap_or_else(|| BedrockConverseModel::DEFAULT_REGION.to_string()),
            log,
            dotenv: DotenvStatus::NotAttempted,
        }
    }

    /// The Langfuse project, or a configuration error naming the keys.
    pub fn langfuse(&self) -> Result<&LangfuseConfig, PromptrailError> {
        self.langfuse.as_ref().ok_or_else(|| {
            PromptrailError::configuration(
                "LANGFUSE_PUBLIC_KEY and LANGFUSE_SECRET_KEY must be set",
            )
        })
    }

    /// Prompt store client for the configured project.
    pub fn prompt_store(&self) -> Result<LangfusePromptStore, PromptrailError> {
        Ok(LangfusePromptStore::new(self.langfuse()?.clone()))
    }

    /// Tracer shipping to Langfuse.
    ///
    /// Falls back to a disabled tracer when tracing is off or Langfuse is
    /// not configured.
    pub fn tracer(&self) -> Tracer {
        if !self.tracing.enabled {
            debug!("Tracing disabled by LANGFUSE_TRACING_ENABLED");
            return Tracer::disabled();
        }
        match &self.langfuse {
            Some(config) => Tracer::new(
                Arc::new(LangfuseCollector::new(config.clone())),
                self.tracing,
            ),
            None => {
                warn!("Langfuse keys missing, observations will not be shipped");
                Tracer::disabled()
            }
        }
    }

    /// Tavily search client.
    pub fn search_backend(&self) -> Result<TavilyClient, PromptrailError> {
        self.tavily_api_key
            .as_deref()
            .map(TavilyClient::new)
            .ok_or_else(|| PromptrailError::configuration("TAVILY_API_KEY must be set"))
    }

    /// Bedrock Converse client in the configured region.
    ///
    /// Keys from the environment win; otherwise the AWS default provider
    /// chain (profiles, SSO, instance metadata) supplies credentials.
    pub async fn bedrock_model(&self) -> Result<BedrockConverseModel, PromptrailError> {
        let model = match self.aws.clone() {
            Some(credentials) => BedrockConverseModel::new(credentials),
            None => {
                debug!("AWS keys not in environment, using the default provider chain");
                BedrockConverseModel::from_default_chain(self.aws_region.clone()).await?
            }
        };
        Ok(model.with_region(self.aws_region.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Settings {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_empty_environment() {
        let s = settings(&[]);
        assert!(s.langfuse.is_none());
        assert!(s.tracing.enabled);
        assert_eq!(s.aws_region, "us-east-1");
        assert!(!s.log.json_output);
        assert!(s.langfuse().unwrap_err().to_string().contains("LANGFUSE_PUBLIC_KEY"));
        assert!(matches!(
            s.search_backend(),
            Err(PromptrailError::Configuration(_))
        ));
        assert!(s.aws.is_none());
        assert_eq!(s.dotenv, DotenvStatus::NotAttempted);
        assert!(!s.tracer().is_enabled());
    }

    #[tokio::test]
    async fn test_full_environment() {
        let s = settings(&[
            ("LANGFUSE_PUBLIC_KEY", "pk-lf-1"),
            ("LANGFUSE_SECRET_KEY", "sk-lf-1"),
            ("LANGFUSE_BASE_URL", "https://langfuse.example.com/"),
            ("TAVILY_API_KEY", "tvly-1"),
            ("AWS_ACCESS_KEY_ID", "AKID"),
            ("AWS_SECRET_ACCESS_KEY", "secret"),
            ("AWS_SESSION_TOKEN", ""),
            ("AWS_DEFAULT_REGION", "us-west-2"),
            ("LOG_FORMAT", "JSON"),
        ]);

        let langfuse = s.langfuse().unwrap();
        assert_eq!(langfuse.host, "https://langfuse.example.com");
        assert_eq!(langfuse.public_key, "pk-lf-1");
        assert_eq!(s.tavily_api_key.as_deref(), Some("tvly-1"));
        assert!(s.aws.as_ref().unwrap().session_token.is_none());
        assert_eq!(s.bedrock_model().await.unwrap().region(), "us-west-2");
        assert!(s.log.json_output);
        assert!(s.prompt_store().is_ok());
    }

    #[test]
    fn test_host_precedence_and_region_precedence() {
        let s = settings(&[
            ("LANGFUSE_PUBLIC_KEY", "pk"),
            ("LANGFUSE_SECRET_KEY", "sk"),
            ("LANGFUSE_HOST", "https://a.example.com"),
            ("LANGFUSE_BASE_URL", "https://b.example.com"),
            ("AWS_REGION", "ap-northeast-1"),
            ("AWS_DEFAULT_REGION", "us-west-2"),
        ]);
        assert_eq!(s.langfuse.unwrap().host, "https://a.example.com");
        assert_eq!(s.aws_region, "ap-northeast-1");
    }

    #[test]
    fn test_tracing_flag() {
        let s = settings(&[("LANGFUSE_TRACING_ENABLED", "false")]);
        assert!(!s.tracing.enabled);
        assert!(!s.tracer().is_enabled());
    }

    #[tokio::test]
    async fn test_tracer_enabled_with_langfuse() {
        let s = settings(&[("LANGFUSE_PUBLIC_KEY", "pk"), ("LANGFUSE_SECRET_KEY", "sk")]);
        assert!(s.tracer().is_enabled());
    }

    #[rstest]
    #[case("json", true)]
    #[case("JSON", true)]
    #[case("text", false)]
    #[case("", false)]
    fn test_log_format(#[case] value: &str, #[case] json: bool) {
        assert_eq!(settings(&[("LOG_FORMAT", value)]).log.json_output, json);
    }

    #[test]
    fn test_dotenv_status() {
        let missing = dotenvy::from_filename("promptrail-no-such-file.env");
        assert_eq!(DotenvStatus::from_result(missing), DotenvStatus::Missing);

        let path = std::env::temp_dir().join(format!("promptrail-{}.env", std::process::id()));
        std::fs::write(&path, "NOT A VALID LINE\n").unwrap();
        let broken = dotenvy::from_path(&path).map(|()| path.clone());
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(
            DotenvStatus::from_result(broken),
            DotenvStatus::Unreadable(_)
        ));

        let loaded = DotenvStatus::from_result(Ok(PathBuf::from(".env")));
        assert_eq!(loaded, DotenvStatus::Loaded(PathBuf::from(".env")));
    }
}
