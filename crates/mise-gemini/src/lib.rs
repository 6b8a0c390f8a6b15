// SPDX-FileCopyrightText: 2026 Mise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gemini provider adapter for the Mise generation service.
//!
//! Wraps the `generateContent` endpoint behind [`ProviderAdapter`], using
//! [`RetryingClient`] for the overload-aware retry loop.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use mise_config::model::GeminiConfig;
use mise_core::traits::{PluginAdapter, ProviderAdapter};
use mise_core::types::{AdapterType, HealthStatus, ProviderRequest, ProviderResponse};
use mise_core::MiseError;
use secrecy::SecretString;
use tracing::{debug, info};

pub use client::{RetryPolicy, RetryingClient, is_transient_message};
use types::{GenerateContentRequest, GenerateContentResponse};

/// Environment variable consulted when `gemini.api_key` is unset.
const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Gemini text-generation provider implementing [`ProviderAdapter`].
pub struct GeminiProvider {
    client: RetryingClient,
    endpoint: String,
    model: String,
}

impl GeminiProvider {
    /// Creates a provider from configuration, resolving the key with [`resolve_api_key`].
    pub fn new(config: &GeminiConfig) -> Result<Self, MiseError> {
        let api_key = resolve_api_key(&config.api_key)?;
        Self::with_key(config, api_key)
    }

    /// Creates a provider with an explicit key, ignoring the environment.
    pub fn with_key(config: &GeminiConfig, api_key: SecretString) -> Result<Self, MiseError> {
        mise_security::validate_url(&config.base_url)?;

        let policy = RetryPolicy {
            max_attempts: config.max_attempts,
            initial_delay: Duration::from_millis(config.initial_delay_ms),
        };
        let client = RetryingClient::new(
            &api_key,
            Duration::from_secs(config.timeout_secs),
            policy,
        )?;
        let endpoint = generate_content_url(&config.base_url, &config.model);

        info!(model = %config.model, max_attempts = policy.max_attempts, "Gemini provider initialized");

        Ok(Self {
            client,
            endpoint,
            model: config.model.clone(),
        })
    }
}

fn generate_content_url(base_url: &str, model: &str) -> String {
    format!(
        "{}/models/{model}:generateContent",
        base_url.trim_end_matches('/')
    )
}

/// Resolve the API key: `gemini.api_key` when non-empty, else `GEMINI_API_KEY`.
pub fn resolve_api_key(config_key: &Option<String>) -> Result<SecretString, MiseError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(SecretString::from(key.clone()));
    }

    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|k| !k.is_empty())
        .map(SecretString::from)
        .ok_or_else(|| {
            MiseError::Config(
                "Gemini API key not found. Set gemini.api_key in config or MISE_GEMINI_API_KEY / GEMINI_API_KEY in the environment.".into(),
            )
        })
}

#[async_trait]
impl PluginAdapter for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, MiseError> {
        // Probing would spend quota; a constructed client is considered healthy.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MiseError> {
        debug!("Gemini provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for GeminiProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, MiseError> {
        let payload = GenerateContentRequest::from_prompt(request.prompt);
        let response = self.client.call(&self.endpoint, &payload).await?;

        let body: GenerateContentResponse =
            response.json().await.map_err(|e| MiseError::Upstream {
                message: format!("failed to parse API response: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(ProviderResponse {
            text: body.first_text().map(str::to_string),
            model: body.model_version.unwrap_or_else(|| self.model.clone()),
        })
    }
}
