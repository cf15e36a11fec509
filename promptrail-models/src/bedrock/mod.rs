//! AWS Bedrock model implementation.
//!
//! Talks to the [Converse API](https://docs.aws.amazon.com/bedrock/latest/APIReference/API_runtime_Converse.html)
//! with SigV4-signed requests. The model id is taken from each request's
//! [`ModelConfig`](promptrail_core::ModelConfig), so one client serves every
//! prompt template.
//!
//! ## Example
//!
//! ```ignore
//! use promptrail_models::bedrock::BedrockConverseModel;
//!
//! // Credentials from the AWS default provider chain
//! let model = BedrockConverseModel::from_default_chain("us-east-1").await?;
//! ```

pub mod types;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_credential_types::Credentials;
use aws_sigv4::http_request::{
    sign, SignableBody, SignableRequest, SigningParams, SigningSettings,
};
use aws_sigv4::sign::v4;
use aws_smithy_runtime_api::client::identity::Identity;
use promptrail_core::{Message, Role, ToolCall, Usage};
use promptrail_tools::ToolDefinition;
use reqwest::Client;
use std::time::{Duration, SystemTime};
use tracing::debug;
use url::Url;

use crate::error::ModelError;
use crate::model::{ChatModel, FinishReason, ModelRequest, ModelResponse};

/// Signing service name for the Bedrock runtime.
const SIGNING_SERVICE: &str = "bedrock";

/// Provider name reported for explicitly supplied keys.
const STATIC_PROVIDER: &str = "promptrail";

/// AWS credentials.
#[derive(Clone)]
pub struct AwsCredentials {
    /// Access key ID.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
    /// Session token (optional).
    pub session_token: Option<String>,
}

impl std::fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .finish()
    }
}

impl AwsCredentials {
    /// Create new credentials.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    /// With session token.
    #[must_use]
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }
}

impl From<AwsCredentials> for Credentials {
    fn from(creds: AwsCredentials) -> Self {
        Credentials::new(
            creds.access_key_id,
            creds.secret_access_key,
            creds.session_token,
            None,
            STATIC_PROVIDER,
        )
    }
}

/// Bedrock Converse client.
#[derive(Debug, Clone)]
pub struct BedrockConverseModel {
    client: Client,
    region: String,
    credentials: SharedCredentialsProvider,
    endpoint: Option<String>,
    timeout: Duration,
}

impl BedrockConverseModel {
    /// Default AWS region.
    pub const DEFAULT_REGION: &'static str = "us-east-1";

    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

    /// Create with explicit credentials in the default region.
    pub fn new(credentials: AwsCredentials) -> Self {
        Self::with_provider(SharedCredentialsProvider::new(Credentials::from(credentials)))
    }

    /// Create with any AWS credentials provider in the default region.
    ///
    /// The provider is asked for credentials on every request, so rotating
    /// credentials (SSO, assumed roles) stay fresh.
    pub fn with_provider(credentials: SharedCredentialsProvider) -> Self {
        Self {
            client: Client::new(),
            region: Self::DEFAULT_REGION.to_string(),
            credentials,
            endpoint: None,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Take the credentials provider and region of a loaded SDK config.
    pub fn from_sdk_config(config: &SdkConfig) -> Result<Self, ModelError> {
        let provider = config
            .credentials_provider()
            .ok_or_else(|| ModelError::configuration("no AWS credentials provider configured"))?;
        let region = config
            .region()
            .map(|r| r.as_ref().to_string())
            .unwrap_or_else(|| Self::DEFAULT_REGION.to_string());
        Ok(Self::with_provider(provider).with_region(region))
    }

    /// Load the AWS default provider chain for `region`: environment,
    /// shared profiles, SSO, web identity and instance metadata.
    pub async fn from_default_chain(region: impl Into<String>) -> Result<Self, ModelError> {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.into()))
            .load()
            .await;
        Self::from_sdk_config(&config)
    }

    /// Set the region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Send requests to a custom base URL instead of the regional endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, base_url: impl Into<String>) -> Self {
        self.endpoint = Some(base_url.into());
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Region requests are signed for.
    pub fn region(&self) -> &str {
        &self.region
    }

    fn base_url(&self) -> String {
        match &self.endpoint {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => format!("https://bedrock-runtime.{}.amazonaws.com", self.region),
        }
    }

    fn converse_url(&self, model_id: &str) -> Result<Url, ModelError> {
        let raw = format!(
            "{}/model/{}/converse",
            self.base_url(),
            urlencoding::encode(model_id)
        );
        Url::parse(&raw).map_err(|e| ModelError::configuration(format!("invalid endpoint: {e}")))
    }

    fn build_request(&self, request: &ModelRequest) -> types::ConverseRequest {
        let mut system = Vec::new();
        if let Some(text) = request.system.as_deref().filter(|s| !s.is_empty()) {
            system.push(types::SystemBlock {
                text: text.to_string(),
            });
        }
        system.extend(
            request
                .messages
                .iter()
                .filter(|m| m.role == Role::System)
                .map(|m| types::SystemBlock {
                    text: m.content.clone(),
                }),
        );

        types::ConverseRequest {
            messages: convert_messages(&request.messages),
            system,
            inference_config: types::InferenceConfig {
                max_tokens: None,
                temperature: Some(request.config.temperature),
            },
            tool_config: build_tool_config(&request.tools),
        }
    }

    /// Signing headers for a POST of `body` to `url`.
    async fn signing_headers(
        &self,
        url: &Url,
        body: &[u8],
    ) -> Result<Vec<(String, String)>, ModelError> {
        let credentials = self
            .credentials
            .provide_credentials()
            .await
            .map_err(|e| ModelError::configuration(format!("AWS credentials unavailable: {e}")))?;
        let identity = Identity::from(credentials);

        let params: SigningParams<'_> = v4::SigningParams::builder()
            .identity(&identity)
            .region(&self.region)
            .name(SIGNING_SERVICE)
            .time(SystemTime::now())
            .settings(SigningSettings::default())
            .build()
            .map_err(|e| ModelError::configuration(format!("invalid signing parameters: {e}")))?
            .into();

        let headers = [("content-type", "application/json")];
        let signable = SignableRequest::new(
            "POST",
            url.as_str(),
            headers.into_iter(),
            SignableBody::Bytes(body),
        )
        .map_err(|e| ModelError::configuration(format!("unsignable request: {e}")))?;

        let (instructions, _signature) = sign(signable, &params)
            .map_err(|e| ModelError::configuration(format!("request signing failed: {e}")))?
            .into_parts();

        Ok(instructions
            .headers()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect())
    }

    fn parse_response(
        &self,
        model_id: &str,
        response: types::ConverseResponse,
    ) -> Result<ModelResponse, ModelError> {
        let message = response
            .output
            .and_then(|o| o.message)
            .ok_or_else(|| ModelError::invalid_response("response has no output message"))?;

        let mut text = String::new();
        let mut calls = Vec::new();
        for block in message.content {
            match block {
                types::ContentBlock::Text(t) => text.push_str(&t),
                types::ContentBlock::ToolUse(tu) => {
                    calls.push(ToolCall::new(tu.name, tu.input).with_id(tu.tool_use_id));
                }
                types::ContentBlock::ToolResult(_) | types::ContentBlock::Unknown(_) => {}
            }
        }

        let usage = response
            .usage
            .map(|u| Usage::with_tokens(u.input_tokens, u.output_tokens))
            .unwrap_or_else(|| Usage {
                requests: 1,
                ..Usage::default()
            });

        Ok(ModelResponse {
            message: Message::assistant_tool_calls(text, calls),
            finish_reason: response
                .stop_reason
                .as_deref()
                .map(FinishReason::from_provider),
            usage,
            model_id: model_id.to_string(),
        })
    }
}

/// Map the conversation onto Converse turns.
///
/// System messages are lifted out separately. Empty text is never sent, and
/// adjacent turns of the same role share one turn, so tool results and a
/// following user message land in a single user turn.
fn convert_messages(messages: &[Message]) -> Vec<types::ConverseMessage> {
    let mut out: Vec<types::ConverseMessage> = Vec::new();

    for message in messages {
        let (role, content) = match message.role {
            Role::System => continue,
            Role::User => (types::ConverseRole::User, text_block(&message.content)),
            Role::Assistant => {
                let mut content = text_block(&message.content);
                content.extend(message.tool_calls.iter().map(|call| {
                    types::ContentBlock::ToolUse(types::ToolUseBlock {
                        tool_use_id: call.id.clone(),
                        name: call.name.clone(),
                        input: call.arguments.clone(),
                    })
                }));
                (types::ConverseRole::Assistant, content)
            }
            Role::Tool => (
                types::ConverseRole::User,
                vec![types::ContentBlock::ToolResult(types::ToolResultBlock {
                    tool_use_id: message.tool_call_id.clone().unwrap_or_default(),
                    content: vec![types::ToolResultContent::Text(message.content.clone())],
                    status: None,
                })],
            ),
        };

        if content.is_empty() {
            continue;
        }
        match out.last_mut() {
            Some(last) if last.role == role => last.content.extend(content),
            _ => out.push(types::ConverseMessage { role, content }),
        }
    }

    out
}

fn text_block(text: &str) -> Vec<types::ContentBlock> {
    if text.trim().is_empty() {
        Vec::new()
    } else {
        vec![types::ContentBlock::Text(text.to_string())]
    }
}

fn build_tool_config(tools: &[ToolDefinition]) -> Option<types::ToolConfig> {
    if tools.is_empty() {
        return None;
    }
    Some(types::ToolConfig {
        tools: tools
            .iter()
            .map(|t| types::ToolEntry {
                tool_spec: types::ToolSpec {
                    name: t.name.clone(),
                    description: t.description.clone(),
                    input_schema: types::ToolInputSchema {
                        json: t.parameters_json_schema.clone(),
                    },
                },
            })
            .collect(),
    })
}

#[async_trait]
impl ChatModel for BedrockConverseModel {
    fn name(&self) -> &str {
        "converse"
    }

    fn system(&self) -> &str {
        "bedrock"
    }

    async fn invoke(&self, request: &ModelRequest) -> Result<ModelResponse, ModelError> {
        let model_id = request.config.model_id.as_str();
        let url = self.converse_url(model_id)?;
        let body = serde_json::to_vec(&self.build_request(request))?;

        let signing_headers = self.signing_headers(&url, &body).await?;

        debug!(
            model = %model_id,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Sending Bedrock Converse request"
        );

        let mut builder = self
            .client
            .post(url)
            .timeout(self.timeout)
            .header("Content-Type", "application/json");
        for (name, value) in signing_headers {
            builder = builder.header(name, value);
        }

        let response = builder.body(body).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            return Err(ModelError::http(status, text));
        }

        let converse_response: types::ConverseResponse = response
            .json()
            .await
            .map_err(|e| ModelError::invalid_response(e.to_string()))?;

        self.parse_response(model_id, converse_response)
    }
}
