//! In-process prompt store.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::error::PromptError;
use crate::store::{check_kind, PromptStore};
use crate::template::{NewPrompt, PromptKind, PromptTemplate, LATEST_LABEL};

/// Prompt store kept in memory.
///
/// Versions are numbered from 1 per name. Each registration moves `latest`
/// and any requested labels to the new version.
#[derive(Debug, Default)]
pub struct InMemoryPromptStore {
    prompts: RwLock<HashMap<String, Vec<PromptTemplate>>>,
}

impl InMemoryPromptStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of versions stored for a name.
    pub fn version_count(&self, name: &str) -> usize {
        self.prompts.read().get(name).map_or(0, Vec::len)
    }
}

#[async_trait]
impl PromptStore for InMemoryPromptStore {
    async fn register(&self, prompt: NewPrompt) -> Result<PromptTemplate, PromptError> {
        prompt.validate()?;

        let mut labels = vec![LATEST_LABEL.to_string()];
        for label in prompt.labels {
            if !labels.contains(&label) {
                labels.push(label);
            }
        }

        let mut prompts = self.prompts.write();
        let versions = prompts.entry(prompt.name.clone()).or_default();
        for older in versions.iter_mut() {
            older.labels.retain(|l| !labels.contains(l));
        }

        let template = PromptTemplate {
            name: prompt.name,
            version: versions.len() as u32 + 1,
            kind: prompt.kind,
            body: prompt.body,
            config: prompt.config.to_json(),
            labels,
            tags: prompt.tags,
        };
        versions.push(template.clone());
        Ok(template)
    }

    async fn fetch(
        &self,
        name: &str,
        kind: PromptKind,
        label: &str,
    ) -> Result<PromptTemplate, PromptError> {
        let found = self
            .prompts
            .read()
            .get(name)
            .and_then(|versions| versions.iter().find(|t| t.has_label(label)).cloned())
            .ok_or_else(|| PromptError::not_found(name, label))?;
        check_kind(found, kind)
    }
}
