// SPDX-FileCopyrightText: 2026 Mise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Mise.
//!
//! - [`MockProvider`] - scripted provider replies with prompt capture
//! - [`MemoryStore`] - in-memory `StorageAdapter` with failure injection
//! - [`RecordingSink`] - `FrameSink` that captures frames and can simulate a disconnect

pub mod memory_store;
pub mod mock_provider;
pub mod recording_sink;

pub use memory_store::MemoryStore;
pub use mock_provider::MockProvider;
pub use recording_sink::RecordingSink;
