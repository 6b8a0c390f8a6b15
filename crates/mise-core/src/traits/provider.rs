// SPDX-FileCopyrightText: 2026 Mise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for text-generation backends.

use async_trait::async_trait;

use crate::error::MiseError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ProviderRequest, ProviderResponse};

/// Adapter for a remote text-generation service.
///
/// Implementations own their retry behavior: a returned error is final.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Sends a prompt and returns the full generated response.
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, MiseError>;
}
