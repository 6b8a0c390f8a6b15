// SPDX-FileCopyrightText: 2026 Mise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory storage adapter.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use mise_core::traits::{PluginAdapter, StorageAdapter};
use mise_core::types::{
    AdapterType, GenerationKind, GenerationResult, HealthStatus, RecordId, UserId,
};
use mise_core::MiseError;

/// A `StorageAdapter` backed by a `Vec`, with switchable insert failures.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<GenerationResult>>,
    fail_inserts: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent insert fail with a storage error.
    pub fn fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of everything stored, in insertion order.
    pub async fn records(&self) -> Vec<GenerationResult> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl PluginAdapter for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, MiseError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MiseError> {
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for MemoryStore {
    async fn initialize(&self) -> Result<(), MiseError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), MiseError> {
        Ok(())
    }

    async fn insert_generation(&self, record: &GenerationResult) -> Result<(), MiseError> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(MiseError::Storage {
                source: "disk I/O error".into(),
            });
        }
        self.records.lock().await.push(record.clone());
        Ok(())
    }

    async fn list_generations(
        &self,
        kind: GenerationKind,
        owner: &UserId,
    ) -> Result<Vec<GenerationResult>, MiseError> {
        Ok(self
            .records
            .lock()
            .await
            .iter()
            .rev()
            .filter(|r| r.kind() == kind && &r.user_id == owner)
            .cloned()
            .collect())
    }

    async fn get_generation(
        &self,
        kind: GenerationKind,
        owner: &UserId,
        id: &RecordId,
    ) -> Result<Option<GenerationResult>, MiseError> {
        Ok(self
            .records
            .lock()
            .await
            .iter()
            .find(|r| r.kind() == kind && &r.user_id == owner && &r.id == id)
            .cloned())
    }

    async fn delete_generation(
        &self,
        kind: GenerationKind,
        owner: &UserId,
        id: &RecordId,
    ) -> Result<bool, MiseError> {
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|r| !(r.kind() == kind && &r.user_id == owner && &r.id == id));
        Ok(records.len() != before)
    }
}
