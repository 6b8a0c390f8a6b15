// SPDX-FileCopyrightText: 2026 Mise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock provider adapter for deterministic testing.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use mise_core::traits::{PluginAdapter, ProviderAdapter};
use mise_core::types::{AdapterType, HealthStatus, ProviderRequest, ProviderResponse};
use mise_core::MiseError;

/// A provider that replays scripted results in FIFO order.
///
/// Once the script runs out, every call returns `"mock response"`.
pub struct MockProvider {
    replies: Mutex<VecDeque<Result<Option<String>, MiseError>>>,
    prompts: Mutex<Vec<String>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Pre-load successful text replies.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            replies: Mutex::new(responses.into_iter().map(|t| Ok(Some(t))).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Queue a reply whose upstream shape carried no text.
    pub async fn push_empty(&self) {
        self.replies.lock().await.push_back(Ok(None));
    }

    /// Queue a failure.
    pub async fn push_error(&self, error: MiseError) {
        self.replies.lock().await.push_back(Err(error));
    }

    /// Prompts received so far, in call order.
    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.prompts.lock().await.len()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, MiseError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MiseError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, MiseError> {
        self.prompts.lock().await.push(request.prompt);
        let reply = self
            .replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(Some("mock response".to_string())));
        reply.map(|text| ProviderResponse {
            text,
            model: "mock-model".to_string(),
        })
    }
}
