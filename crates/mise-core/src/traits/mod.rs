// SPDX-FileCopyrightText: 2026 Mise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the Mise service seams.
//!
//! Provider, storage, and auth adapters extend the [`PluginAdapter`] base trait
//! and use `#[async_trait]` for dynamic dispatch compatibility. [`FrameSink`]
//! is the outbound side of a streaming connection.

pub mod adapter;
pub mod auth;
pub mod provider;
pub mod sink;
pub mod storage;

pub use adapter::PluginAdapter;
pub use auth::AuthAdapter;
pub use provider::ProviderAdapter;
pub use sink::FrameSink;
pub use storage::StorageAdapter;
