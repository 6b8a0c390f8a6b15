// SPDX-FileCopyrightText: 2026 Mise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use mise_config::model::StorageConfig;
use mise_core::types::{GenerationKind, GenerationParams, GenerationResult, RecordId, UserId};
use mise_core::{AdapterType, HealthStatus, MiseError, PluginAdapter, StorageAdapter};

use crate::database::Database;
use crate::queries::{meal_plans, recipes};

/// SQLite-backed storage adapter.
///
/// The database is opened lazily by [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// The connection is not opened until `initialize` is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, MiseError> {
        self.db.get().ok_or_else(|| MiseError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, MiseError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.query_row("SELECT 1", [], |_| Ok(()))?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MiseError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), MiseError> {
        let db =
            Database::open_with_options(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| MiseError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), MiseError> {
        self.db()?.checkpoint().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    async fn insert_generation(&self, record: &GenerationResult) -> Result<(), MiseError> {
        let db = self.db()?;
        match &record.params {
            GenerationParams::Recipe(params) => recipes::insert_recipe(db, record, params).await,
            GenerationParams::MealPlan(params) => {
                meal_plans::insert_meal_plan(db, record, params).await
            }
        }
    }

    async fn list_generations(
        &self,
        kind: GenerationKind,
        owner: &UserId,
    ) -> Result<Vec<GenerationResult>, MiseError> {
        let db = self.db()?;
        match kind {
            GenerationKind::Recipe => recipes::list_recipes(db, owner).await,
            GenerationKind::MealPlan => meal_plans::list_meal_plans(db, owner).await,
        }
    }

    async fn get_generation(
        &self,
        kind: GenerationKind,
        owner: &UserId,
        id: &RecordId,
    ) -> Result<Option<GenerationResult>, MiseError> {
        let db = self.db()?;
        match kind {
            GenerationKind::Recipe => recipes::get_recipe(db, owner, id).await,
            GenerationKind::MealPlan => meal_plans::get_meal_plan(db, owner, id).await,
        }
    }

    async fn delete_generation(
        &self,
        kind: GenerationKind,
        owner: &UserId,
        id: &RecordId,
    ) -> Result<bool, MiseError> {
        let db = self.db()?;
        match kind {
            GenerationKind::Recipe => recipes::delete_recipe(db, owner, id).await,
            GenerationKind::MealPlan => meal_plans::delete_meal_plan(db, owner, id).await,
        }
    }
}
