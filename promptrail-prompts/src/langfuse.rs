//! Langfuse prompt management client.
//!
//! Talks to the public v2 prompts API:
//!
//! - `POST {host}/api/public/v2/prompts` registers a new version
//! - `GET {host}/api/public/v2/prompts/{name}?label=..` fetches one
//!
//! Both use HTTP basic auth with the project's public and secret keys.

use async_trait::async_trait;
use promptrail_core::{LangfuseConfig, ProviderError};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::error::PromptError;
use crate::store::{check_kind, PromptStore};
use crate::template::{NewPrompt, PromptKind, PromptTemplate};

const PROVIDER: &str = "langfuse";

#[derive(Debug, Deserialize)]
struct LangfuseErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Prompt store backed by a Langfuse project.
#[derive(Debug, Clone)]
pub struct LangfusePromptStore {
    config: LangfuseConfig,
    client: Client,
}

impl LangfusePromptStore {
    /// Create a client for the given project.
    #[must_use]
    pub fn new(config: LangfuseConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_default();
        Self { config, client }
    }

    /// Connection settings in use.
    pub fn config(&self) -> &LangfuseConfig {
        &self.config
    }

    fn prompts_url(&self) -> String {
        self.config.url("/api/public/v2/prompts")
    }

    async fn read_template(response: Response) -> Result<PromptTemplate, PromptError> {
        let body = response
            .text()
            .await
            .map_err(|e| PromptError::transport(PROVIDER, e))?;
        serde_json::from_str(&body).map_err(|e| {
            PromptError::Provider(ProviderError::new(
                PROVIDER,
                format!("unexpected prompt payload: {e}"),
            ))
        })
    }

    async fn error_from(response: Response) -> ProviderError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<LangfuseErrorBody>(&body)
            .ok()
            .and_then(|b| b.message.or(b.error))
            .unwrap_or(body);
        ProviderError::http(PROVIDER, status, message)
    }
}

#[async_trait]
impl PromptStore for LangfusePromptStore {
    async fn register(&self, prompt: NewPrompt) -> Result<PromptTemplate, PromptError> {
        prompt.validate()?;

        let payload = serde_json::json!({
            "name": prompt.name,
            "type": prompt.kind,
            "prompt": prompt.body,
            "config": prompt.config.to_json(),
            "labels": prompt.labels,
            "tags": prompt.tags,
        });
        debug!(name = %prompt.name, kind = %prompt.kind, "Registering prompt");

        let response = self
            .client
            .post(self.prompts_url())
            .basic_auth(&self.config.public_key, Some(&self.config.secret_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| PromptError::transport(PROVIDER, e))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await.into());
        }
        Self::read_template(response).await
    }

    async fn fetch(
        &self,
        name: &str,
        kind: PromptKind,
        label: &str,
    ) -> Result<PromptTemplate, PromptError> {
        let url = format!("{}/{}", self.prompts_url(), urlencoding::encode(name));
        debug!(name, label, "Fetching prompt");

        let response = self
            .client
            .get(url)
            .basic_auth(&self.config.public_key, Some(&self.config.secret_key))
            .query(&[("label", label)])
            .send()
            .await
            .map_err(|e| PromptError::transport(PROVIDER, e))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(PromptError::not_found(name, label)),
            status if status.is_success() => check_kind(Self::read_template(response).await?, kind),
            _ => Err(Self::error_from(response).await.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{ChatMessageTemplate, LATEST_LABEL};
    use promptrail_core::ModelConfig;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store(server: &MockServer) -> LangfusePromptStore {
        LangfusePromptStore::new(LangfuseConfig::new("pk-lf-test", "sk-lf-test").with_host(server.uri()))
    }

    fn stored_prompt() -> serde_json::Value {
        json!({
            "id": "abc",
            "name": "ai-agent",
            "version": 3,
            "type": "chat",
            "prompt": [
                {"role": "system", "content": "あなたは優秀なアシスタントです。"},
                {"role": "user", "content": "{{city}}の人口は？"}
            ],
            "config": {"model": "us.anthropic.claude-3-7-sonnet-20250219-v1:0", "temperature": 0.5},
            "labels": ["latest"],
            "tags": []
        })
    }

    #[tokio::test]
    async fn test_register_posts_prompt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/public/v2/prompts"))
            .and(header_exists("authorization"))
            .and(body_partial_json(json!({
                "name": "ai-agent",
                "type": "chat",
                "config": {"temperature": 0.5}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(stored_prompt()))
            .expect(1)
            .mount(&server)
            .await;

        let prompt = NewPrompt::chat(
            "ai-agent",
            vec![
                ChatMessageTemplate::system("あなたは優秀なアシスタントです。"),
                ChatMessageTemplate::user("{{city}}の人口は？"),
            ],
            ModelConfig::new("us.anthropic.claude-3-7-sonnet-20250219-v1:0", 0.5).unwrap(),
        );
        let created = store(&server).register(prompt).await.unwrap();
        assert_eq!(created.name, "ai-agent");
        assert_eq!(created.version, 3);
    }

    #[tokio::test]
    async fn test_register_validates_before_sending() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let prompt = NewPrompt::chat("", vec![], ModelConfig::new("m1", 0.5).unwrap());
        let err = store(&server).register(prompt).await.unwrap_err();
        assert!(matches!(err, PromptError::Validation(_)));
    }

    #[tokio::test]
    async fn test_fetch_latest() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/public/v2/prompts/ai-agent"))
            .and(query_param("label", LATEST_LABEL))
            .respond_with(ResponseTemplate::new(200).set_body_json(stored_prompt()))
            .mount(&server)
            .await;

        let template = store(&server).fetch_latest("ai-agent").await.unwrap();
        assert_eq!(template.kind, PromptKind::Chat);
        assert_eq!(template.model_config().unwrap().temperature, 0.5);
    }

    #[tokio::test]
    async fn test_fetch_encodes_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/public/v2/prompts/team%2Fagent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(stored_prompt()))
            .expect(1)
            .mount(&server)
            .await;

        store(&server).fetch_latest("team/agent").await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Prompt not found"})))
            .mount(&server)
            .await;

        let err = store(&server).fetch_latest("missing").await.unwrap_err();
        assert!(matches!(err, PromptError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_fetch_kind_mismatch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(stored_prompt()))
            .mount(&server)
            .await;

        let err = store(&server)
            .fetch("ai-agent", PromptKind::Text, LATEST_LABEL)
            .await
            .unwrap_err();
        assert!(matches!(err, PromptError::Validation(_)));
    }

    #[tokio::test]
    async fn test_server_error_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})))
            .mount(&server)
            .await;

        match store(&server).fetch_latest("ai-agent").await.unwrap_err() {
            PromptError::Provider(e) => {
                assert_eq!(e.status, Some(500));
                assert_eq!(e.message, "boom");
                assert!(e.is_server_error());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_payload_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = store(&server).fetch_latest("ai-agent").await.unwrap_err();
        assert!(matches!(err, PromptError::Provider(_)));
    }
}
