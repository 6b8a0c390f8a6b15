// SPDX-FileCopyrightText: 2026 Mise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `mise serve` command implementation.
//!
//! Wires the Gemini provider, SQLite storage and token auth into the
//! orchestrator and gateway, then serves until a shutdown signal arrives.

use std::sync::{Arc, RwLock};
use std::time::Instant;

use mise_auth::TokenAuthAdapter;
use mise_config::MiseConfig;
use mise_core::MiseError;
use mise_core::traits::{PluginAdapter, StorageAdapter};
use mise_gateway::{GatewayState, start_server};
use mise_gemini::GeminiProvider;
use mise_generation::{Orchestrator, StreamSettings};
use mise_security::{RedactingWriter, SecretList, add_secret};
use mise_storage::SqliteStorage;
use secrecy::ExposeSecret;
use tracing::{info, warn};

use crate::shutdown;

/// Runs the `mise serve` command.
pub async fn run_serve(config: MiseConfig) -> Result<(), MiseError> {
    let secrets: SecretList = Arc::new(RwLock::new(Vec::new()));
    init_tracing(&config.server.log_level, secrets.clone());

    info!("starting mise serve");

    let (state, storage) = build_state(&config, secrets).await?;
    let adapters = state.adapters.clone();
    let cancel = shutdown::install_signal_handler();

    let served = start_server(&config.server, state, cancel).await;

    for adapter in &adapters {
        if let Err(e) = adapter.shutdown().await {
            warn!(adapter = adapter.name(), error = %e, "adapter shutdown failed");
        }
    }
    if let Err(e) = storage.close().await {
        warn!(error = %e, "storage close failed");
    }
    served
}

/// Build the gateway state from configuration.
///
/// Every credential is registered in `secrets` before any adapter can log
/// or report it.
pub async fn build_state(
    config: &MiseConfig,
    secrets: SecretList,
) -> Result<(GatewayState, Arc<SqliteStorage>), MiseError> {
    let api_key = mise_gemini::resolve_api_key(&config.gemini.api_key)?;
    add_secret(&secrets, api_key.expose_secret().to_string());
    if let Some(seed) = &config.auth.signing_key {
        add_secret(&secrets, seed.clone());
    }

    let provider = Arc::new(GeminiProvider::with_key(&config.gemini, api_key)?);

    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;
    info!(path = %config.storage.database_path, "storage initialized");

    let auth = Arc::new(TokenAuthAdapter::from_config(&config.auth)?);

    let orchestrator = Orchestrator::new(
        provider.clone(),
        storage.clone(),
        StreamSettings::from(&config.stream),
        secrets,
    );

    let adapters = vec![
        provider as Arc<dyn PluginAdapter>,
        storage.clone() as Arc<dyn PluginAdapter>,
        auth.clone() as Arc<dyn PluginAdapter>,
    ];

    let state = GatewayState {
        orchestrator,
        store: storage.clone(),
        auth,
        adapters,
        stream_buffer: config.stream.buffer,
        start_time: Instant::now(),
    };

    Ok((state, storage))
}

/// Initializes the tracing subscriber; all output passes through redaction.
fn init_tracing(log_level: &str, secrets: SecretList) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mise={log_level},warn")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(move || RedactingWriter::new(std::io::stderr(), secrets.clone()))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use mise_core::types::HealthStatus;

    fn config_in(dir: &tempfile::TempDir) -> MiseConfig {
        let mut config = MiseConfig::default();
        config.gemini.api_key = Some("AIza-test-key".into());
        config.gemini.base_url = "http://127.0.0.1:9/v1beta".into();
        config.auth.signing_key = Some("ab".repeat(32));
        config.storage.database_path = dir.path().join("mise.db").display().to_string();
        config
    }

    #[tokio::test]
    async fn build_state_registers_secrets_and_adapters() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        let secrets: SecretList = Arc::new(RwLock::new(Vec::new()));

        let (state, storage) = build_state(&config, secrets.clone()).await.unwrap();

        let registered = mise_security::snapshot(&secrets);
        assert!(registered.contains(&"AIza-test-key".to_string()));
        assert!(registered.contains(&"ab".repeat(32)));

        let names: Vec<&str> = state.adapters.iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["gemini", "sqlite", "token-auth"]);
        assert_eq!(state.stream_buffer, config.stream.buffer);
        assert_eq!(storage.health_check().await.unwrap(), HealthStatus::Healthy);
        storage.close().await.unwrap();
    }

    #[tokio::test]
    async fn build_state_rejects_remote_plain_http() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(&dir);
        config.gemini.base_url = "http://generativelanguage.googleapis.com/v1beta".into();
        let secrets: SecretList = Arc::new(RwLock::new(Vec::new()));

        assert!(matches!(
            build_state(&config, secrets).await,
            Err(MiseError::Config(_))
        ));
    }
}
