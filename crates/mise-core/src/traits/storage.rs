// SPDX-FileCopyrightText: 2026 Mise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for persisting generation records.

use async_trait::async_trait;

use crate::error::MiseError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{GenerationKind, GenerationResult, RecordId, UserId};

/// Adapter for storage and persistence backends.
///
/// Every read and delete is scoped to an owner: a record belonging to another
/// user behaves exactly like a missing one.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), MiseError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), MiseError>;

    /// Persists a completed generation.
    async fn insert_generation(&self, record: &GenerationResult) -> Result<(), MiseError>;

    /// Lists the owner's records of one kind, newest first.
    async fn list_generations(
        &self,
        kind: GenerationKind,
        owner: &UserId,
    ) -> Result<Vec<GenerationResult>, MiseError>;

    /// Fetches one record if it exists and belongs to `owner`.
    async fn get_generation(
        &self,
        kind: GenerationKind,
        owner: &UserId,
        id: &RecordId,
    ) -> Result<Option<GenerationResult>, MiseError>;

    /// Deletes one record; returns `false` when nothing matched.
    async fn delete_generation(
        &self,
        kind: GenerationKind,
        owner: &UserId,
        id: &RecordId,
    ) -> Result<bool, MiseError>;
}
