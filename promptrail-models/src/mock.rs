//! Mock and function-based models for testing.
//!
//! - [`MockModel`] replays a scripted queue of responses.
//! - [`FunctionModel`] computes each response from the request.
//!
//! ```rust
//! use promptrail_models::MockModel;
//!
//! let model = MockModel::new("test")
//!     .with_text_response("First response")
//!     .with_text_response("Second response");
//! assert_eq!(model.remaining(), 2);
//! ```

use async_trait::async_trait;
use parking_lot::Mutex;
use promptrail_core::ToolCall;
use std::collections::VecDeque;
use std::sync::Arc;

use crate::error::ModelError;
use crate::model::{ChatModel, ModelRequest, ModelResponse};

// ============================================================================
// MockModel
// ============================================================================

/// A model that returns pre-configured responses in order.
///
/// Once the script runs out every call answers with `"Mock response"`.
/// Clones share the script and the request log.
#[derive(Debug, Clone)]
pub struct MockModel {
    name: String,
    script: Arc<Mutex<VecDeque<Result<ModelResponse, ModelError>>>>,
    requests: Arc<Mutex<Vec<ModelRequest>>>,
}

impl MockModel {
    /// Create a new mock model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a response.
    #[must_use]
    pub fn with_response(self, response: ModelResponse) -> Self {
        self.script.lock().push_back(Ok(response));
        self
    }

    /// Queue a plain text answer.
    #[must_use]
    pub fn with_text_response(self, text: impl Into<String>) -> Self {
        let response = ModelResponse::text(self.name.clone(), text);
        self.with_response(response)
    }

    /// Queue an answer requesting one tool call.
    #[must_use]
    pub fn with_tool_call_response(
        self,
        tool_name: impl Into<String>,
        arguments: serde_json::Value,
    ) -> Self {
        let call = ToolCall::new(tool_name, arguments);
        let response = ModelResponse::tool_calls(self.name.clone(), "", vec![call]);
        self.with_response(response)
    }

    /// Queue a failure.
    #[must_use]
    pub fn with_error(self, error: ModelError) -> Self {
        self.script.lock().push_back(Err(error));
        self
    }

    /// Scripted responses not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.lock().len()
    }

    /// Requests received so far.
    pub fn recorded_requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ChatModel for MockModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn system(&self) -> &str {
        "mock"
    }

    async fn invoke(&self, request: &ModelRequest) -> Result<ModelResponse, ModelError> {
        self.requests.lock().push(request.clone());

        let next = self.script.lock().pop_front();
        match next {
            Some(result) => result,
            None => Ok(ModelResponse::text(self.name.clone(), "Mock response")),
        }
    }
}

// ============================================================================
// FunctionModel
// ============================================================================

/// Callback type for [`FunctionModel`].
pub type FunctionDef =
    dyn Fn(&ModelRequest) -> Result<ModelResponse, ModelError> + Send + Sync;

/// A model controlled by a local function.
///
/// ```rust
/// use promptrail_models::{FunctionModel, ModelResponse};
///
/// let model = FunctionModel::new(|request| {
///     Ok(ModelResponse::text("echo", format!("{} messages", request.messages.len())))
/// });
/// ```
#[derive(Clone)]
pub struct FunctionModel {
    name: String,
    function: Arc<FunctionDef>,
}

impl std::fmt::Debug for FunctionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionModel")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl FunctionModel {
    /// Create a model backed by `function`.
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(&ModelRequest) -> Result<ModelResponse, ModelError> + Send + Sync + 'static,
    {
        Self {
            name: "function-model".to_string(),
            function: Arc::new(function),
        }
    }

    /// Set a custom model name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[async_trait]
impl ChatModel for FunctionModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn system(&self) -> &str {
        "function"
    }

    async fn invoke(&self, request: &ModelRequest) -> Result<ModelResponse, ModelError> {
        (self.function)(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptrail_core::{Message, ModelConfig};

    fn request(text: &str) -> ModelRequest {
        ModelRequest::new(
            ModelConfig::new("m", 0.0).unwrap(),
            vec![Message::user(text)],
        )
    }

    #[tokio::test]
    async fn test_mock_replays_script_then_default() {
        let model = MockModel::new("test")
            .with_tool_call_response("tavily_search", serde_json::json!({"query": "x"}))
            .with_text_response("done");

        let first = model.invoke(&request("a")).await.unwrap();
        assert!(first.message.has_tool_calls());
        let second = model.invoke(&request("b")).await.unwrap();
        assert_eq!(second.text_content(), "done");
        let third = model.invoke(&request("c")).await.unwrap();
        assert_eq!(third.text_content(), "Mock response");

        let recorded = model.recorded_requests();
        assert_eq!(recorded.len(), 3);
        assert_eq!(recorded[1].messages[0].content, "b");
    }

    #[tokio::test]
    async fn test_mock_scripted_error() {
        let model = MockModel::new("test").with_error(ModelError::http(500, "boom"));
        let err = model.invoke(&request("a")).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(model.remaining(), 0);
    }

    #[tokio::test]
    async fn test_function_model() {
        let model = FunctionModel::new(|req| {
            Ok(ModelResponse::text(
                req.config.model_id.clone(),
                req.messages[0].content.to_uppercase(),
            ))
        })
        .with_name("upper");

        assert_eq!(model.identifier(), "function:upper");
        let response = model.invoke(&request("hi")).await.unwrap();
        assert_eq!(response.text_content(), "HI");
        assert_eq!(response.model_id, "m");
    }
}
