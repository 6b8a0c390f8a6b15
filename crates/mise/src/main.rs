// SPDX-FileCopyrightText: 2026 Mise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mise - recipe and meal-plan generation service.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mise_auth::TokenAuthAdapter;
use mise_config::MiseConfig;
use mise_core::MiseError;

/// Mise - recipe and meal-plan generation service.
#[derive(Parser, Debug)]
#[command(name = "mise", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server.
    Serve,
    /// Inspect configuration.
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
    /// Manage session tokens.
    Token {
        #[command(subcommand)]
        action: TokenCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Load and validate configuration, then print a summary.
    Check,
}

#[derive(Subcommand, Debug)]
enum TokenCommands {
    /// Mint a bearer token for a user.
    Issue {
        /// Owning user identifier.
        user_id: String,
    },
}

fn load_config(path: Option<&PathBuf>) -> MiseConfig {
    let result = match path {
        Some(path) => mise_config::load_and_validate_path(path),
        None => mise_config::load_and_validate(),
    };
    match result {
        Ok(config) => config,
        Err(errors) => {
            mise_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

fn config_summary(config: &MiseConfig) -> String {
    let key_status = if mise_gemini::resolve_api_key(&config.gemini.api_key).is_ok() {
        "set"
    } else {
        "missing"
    };
    let signing_status = if config.auth.signing_key.is_some() {
        "set"
    } else {
        "ephemeral"
    };
    [
        format!("listen:       {}:{}", config.server.host, config.server.port),
        format!("model:        {}", config.gemini.model),
        format!("api key:      {key_status}"),
        format!("attempts:     {}", config.gemini.max_attempts),
        format!("database:     {}", config.storage.database_path),
        format!("signing key:  {signing_status}"),
    ]
    .join("\n")
}

fn issue_token(config: &MiseConfig, user_id: &str) -> Result<String, MiseError> {
    if config.auth.signing_key.is_none() {
        return Err(MiseError::Config(
            "auth.signing_key must be set to issue tokens that the server will accept".into(),
        ));
    }
    TokenAuthAdapter::from_config(&config.auth)?.issue(user_id)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref());

    let result = match cli.command {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Config {
            action: ConfigCommands::Check,
        } => {
            println!("mise: config OK\n{}", config_summary(&config));
            Ok(())
        }
        Commands::Token {
            action: TokenCommands::Issue { user_id },
        } => issue_token(&config, &user_id).map(|token| println!("{token}")),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_token_issue_with_global_config() {
        let cli = Cli::try_parse_from(["mise", "token", "issue", "u1", "--config", "/tmp/m.toml"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/m.toml")));
        match cli.command {
            Commands::Token {
                action: TokenCommands::Issue { user_id },
            } => assert_eq!(user_id, "u1"),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["mise"]).is_err());
    }

    #[test]
    fn token_issue_requires_persistent_signing_key() {
        let config = MiseConfig::default();
        assert!(matches!(
            issue_token(&config, "u1"),
            Err(MiseError::Config(_))
        ));
    }

    #[test]
    fn token_issue_produces_verifiable_token() {
        let mut config = MiseConfig::default();
        config.auth.signing_key = Some("11".repeat(32));
        let token = issue_token(&config, "u1").unwrap();
        assert!(token.contains('.'));
    }

    #[test]
    fn summary_never_prints_secrets() {
        let mut config = MiseConfig::default();
        config.gemini.api_key = Some("AIza-super-secret".into());
        config.auth.signing_key = Some("22".repeat(32));
        let summary = config_summary(&config);
        assert!(summary.contains("api key:      set"));
        assert!(!summary.contains("super-secret"));
        assert!(!summary.contains(&"22".repeat(32)));
    }
}
