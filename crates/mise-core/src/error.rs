// SPDX-FileCopyrightText: 2026 Mise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Mise generation service.

use thiserror::Error;

/// The primary error type used across all Mise adapter traits and core operations.
#[derive(Debug, Error)]
pub enum MiseError {
    /// Configuration errors (invalid TOML, missing required fields, bad secrets).
    #[error("configuration error: {0}")]
    Config(String),

    /// A required generation parameter was absent or blank.
    #[error("{field} parameter is required")]
    Validation { field: &'static str },

    /// The upstream generation service rejected the request with a non-transient error.
    #[error("{message}")]
    Upstream {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The upstream generation service stayed overloaded for the whole attempt budget.
    #[error("Model is overloaded. Please try again later.")]
    ServiceUnavailable { attempts: u32 },

    /// The upstream call succeeded but carried no extractable text.
    #[error("Received empty response from API")]
    EmptyResult,

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Missing, malformed, or expired credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// A record does not exist for the requesting owner.
    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MiseError {
    /// Build an upstream error without an underlying cause.
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true when the failure was caused by the caller rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::Unauthorized(_) | Self::NotFound { .. }
        )
    }
}
