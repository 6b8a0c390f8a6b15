// SPDX-FileCopyrightText: 2026 Mise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./mise.toml` > `~/.config/mise/mise.toml` > `/etc/mise/mise.toml`
//! with environment variable overrides via the `MISE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::Path;

use figment::{
    Figment,
    providers::{Data, Env, Format, Serialized, Toml},
};
use tracing::debug;

use crate::model::MiseConfig;

pub(crate) const SYSTEM_CONFIG_PATH: &str = "/etc/mise/mise.toml";

/// Sections that `MISE_<SECTION>_<KEY>` variables may target.
const SECTIONS: &[&str] = &["server", "gemini", "stream", "storage", "auth"];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/mise/mise.toml`
/// 3. `~/.config/mise/mise.toml`
/// 4. `./mise.toml`
/// 5. `MISE_*` environment variables
pub fn load_config() -> Result<MiseConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<MiseConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MiseConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<MiseConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MiseConfig::default()))
        .merge(file_layer(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(MiseConfig::default()))
        .merge(file_layer(Path::new(SYSTEM_CONFIG_PATH)))
        .merge(file_layer(
            &dirs::config_dir()
                .map(|d| d.join("mise/mise.toml"))
                .unwrap_or_default(),
        ))
        .merge(file_layer(Path::new("mise.toml")))
        .merge(env_provider())
}

/// TOML layer for `path`; a missing file contributes nothing.
fn file_layer(path: &Path) -> Data<Toml> {
    if path.is_file() {
        debug!(path = %path.display(), "loading configuration file");
    } else {
        debug!(path = %path.display(), "configuration file not present, skipping");
    }
    Toml::file(path)
}

/// Environment provider with explicit section mapping.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `MISE_GEMINI_API_KEY` maps to `gemini.api_key` rather than `gemini.api.key`.
pub(crate) fn env_provider() -> Env {
    Env::prefixed("MISE_").map(|key| map_env_key(key.as_str()).into())
}

fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|r| r.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(map_env_key("gemini_api_key"), "gemini.api_key");
        assert_eq!(map_env_key("server_port"), "server.port");
        assert_eq!(map_env_key("stream_frame_delay_ms"), "stream.frame_delay_ms");
        assert_eq!(map_env_key("auth_token_ttl_secs"), "auth.token_ttl_secs");
    }

    #[test]
    #[tracing_test::traced_test]
    fn file_layers_are_logged() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "[server]\nport = 9001\n")?;
            let config = load_config_from_path(Path::new("custom.toml"))?;
            assert_eq!(config.server.port, 9001);
            Ok(())
        });
        assert!(logs_contain("loading configuration file"));
        assert!(logs_contain("custom.toml"));
    }

    #[test]
    fn unknown_section_is_left_alone() {
        assert_eq!(map_env_key("servers_port"), "servers_port");
        assert_eq!(map_env_key("other"), "other");
    }

    #[test]
    fn env_overrides_are_applied() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("MISE_GEMINI_API_KEY", "from-env");
            jail.set_env("MISE_SERVER_PORT", "8088");
            jail.set_env("MISE_STREAM_CHUNK_SIZE", "40");
            let config: MiseConfig = Figment::new()
                .merge(Serialized::defaults(MiseConfig::default()))
                .merge(env_provider())
                .extract()?;
            assert_eq!(config.gemini.api_key.as_deref(), Some("from-env"));
            assert_eq!(config.server.port, 8088);
            assert_eq!(config.stream.chunk_size, 40);
            Ok(())
        });
    }

    #[test]
    fn local_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("mise.toml", "[gemini]\nmodel = \"gemini-test\"\n")?;
            let config = load_config()?;
            assert_eq!(config.gemini.model, "gemini-test");
            assert_eq!(config.gemini.max_attempts, 3);
            Ok(())
        });
    }
}
