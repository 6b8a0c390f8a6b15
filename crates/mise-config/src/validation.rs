// SPDX-FileCopyrightText: 2026 Mise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that serde attributes cannot express.

use crate::diagnostic::ConfigError;
use crate::model::MiseConfig;

const MIN_TOKEN_TTL_SECS: u64 = 60;

/// Validate a deserialized configuration.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &MiseConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let host = config.server.host.trim();
    if host.is_empty() {
        fail("server.host must not be empty".to_string());
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            fail(format!(
                "server.host `{host}` is not a valid IP address or hostname"
            ));
        }
    }

    if config.server.port == 0 {
        fail("server.port must not be 0".to_string());
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    if config.gemini.max_attempts < 1 {
        fail("gemini.max_attempts must be at least 1".to_string());
    }

    if config.gemini.base_url.trim().is_empty() {
        fail("gemini.base_url must not be empty".to_string());
    }

    if config.stream.chunk_size < 1 {
        fail("stream.chunk_size must be at least 1".to_string());
    }

    if config.stream.buffer < 1 {
        fail("stream.buffer must be at least 1".to_string());
    }

    if let Some(key) = &config.auth.signing_key
        && (key.len() != 64 || !key.chars().all(|c| c.is_ascii_hexdigit()))
    {
        fail("auth.signing_key must be 64 hex characters (a 32-byte seed)".to_string());
    }

    if config.auth.token_ttl_secs < MIN_TOKEN_TTL_SECS {
        fail(format!(
            "auth.token_ttl_secs must be at least {MIN_TOKEN_TTL_SECS}, got {}",
            config.auth.token_ttl_secs
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
