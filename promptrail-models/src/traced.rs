//! Model wrapper that records every invocation as an observation.

use async_trait::async_trait;
use promptrail_tracing::Tracer;

use crate::error::ModelError;
use crate::model::{ChatModel, ModelRequest, ModelResponse};

/// Observation name used for model calls.
pub const MODEL_OBSERVATION: &str = "model.invoke";

/// Wraps a model so each `invoke` is observed by a [`Tracer`].
///
/// The inner result is returned unchanged.
#[derive(Debug, Clone)]
pub struct TracedModel<M> {
    inner: M,
    tracer: Tracer,
}

impl<M: ChatModel> TracedModel<M> {
    /// Wrap `inner`.
    pub fn new(inner: M, tracer: Tracer) -> Self {
        Self { inner, tracer }
    }

    /// The wrapped model.
    pub fn inner(&self) -> &M {
        &self.inner
    }
}

#[async_trait]
impl<M: ChatModel> ChatModel for TracedModel<M> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn system(&self) -> &str {
        self.inner.system()
    }

    async fn invoke(&self, request: &ModelRequest) -> Result<ModelResponse, ModelError> {
        self.tracer
            .observe(MODEL_OBSERVATION, request, self.inner.invoke(request))
            .await
    }
}
