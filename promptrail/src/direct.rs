//! Direct model calls without the agent loop.
//!
//! Use these for one-off requests: a single round trip, no tools.
//!
//! ```rust
//! use promptrail::direct::chat;
//! use promptrail::models::MockModel;
//! use promptrail::ModelConfig;
//!
//! # tokio_test::block_on(async {
//! let model = MockModel::new("m1").with_text_response("こんにちは！");
//! let config = ModelConfig::new("m1", 1.0).unwrap();
//! let reply = chat(&model, &config, "こんにちは").await.unwrap();
//! assert_eq!(reply.content, "こんにちは！");
//! # });
//! ```

use promptrail_core::{Message, ModelConfig, PromptrailError};
use promptrail_models::{ChatModel, ModelRequest, ModelResponse};
use tracing::debug;

/// Send `messages` to `model` once.
pub async fn model_request<M>(
    model: &M,
    config: &ModelConfig,
    messages: Vec<Message>,
) -> Result<ModelResponse, PromptrailError>
where
    M: ChatModel + ?Sized,
{
    debug!(
        model = %model.identifier(),
        model_id = %config.model_id,
        messages = messages.len(),
        "Direct model request"
    );
    let request = ModelRequest::new(config.clone(), messages);
    Ok(model.invoke(&request).await?)
}

/// Send one user message and return the assistant reply.
pub async fn chat<M>(
    model: &M,
    config: &ModelConfig,
    text: impl Into<String>,
) -> Result<Message, PromptrailError>
where
    M: ChatModel + ?Sized,
{
    let response = model_request(model, config, vec![Message::user(text)]).await?;
    Ok(response.message)
}
