// SPDX-FileCopyrightText: 2026 Mise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Mise generation service.
//!
//! This crate provides the trait definitions, error type, and domain types
//! shared by every other crate in the workspace.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::MiseError;
pub use types::{
    AdapterType, AuthIdentity, AuthToken, Frame, GenerationKind, GenerationParams,
    GenerationRequest, GenerationResult, HealthStatus, MealPlanParams, ProviderRequest,
    ProviderResponse, RecipeParams, RecordId, UserId,
};

pub use traits::{AuthAdapter, FrameSink, PluginAdapter, ProviderAdapter, StorageAdapter};
