// SPDX-FileCopyrightText: 2026 Mise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session-token authentication adapter.
//!
//! Implements `AuthAdapter` by verifying Ed25519-signed tokens that name the
//! owning user and an expiry time.

pub mod keypair;
pub mod token;

pub use keypair::SigningKeypair;
pub use token::SessionClaims;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, warn};

use mise_config::model::AuthConfig;
use mise_core::traits::{AuthAdapter, PluginAdapter};
use mise_core::types::{AdapterType, AuthIdentity, AuthToken, HealthStatus, UserId};
use mise_core::MiseError;

/// Token-based authentication adapter.
pub struct TokenAuthAdapter {
    keypair: SigningKeypair,
    ttl_secs: i64,
}

impl TokenAuthAdapter {
    pub fn new(keypair: SigningKeypair, ttl_secs: u64) -> Self {
        Self {
            keypair,
            ttl_secs: i64::try_from(ttl_secs).unwrap_or(i64::MAX),
        }
    }

    /// Build from configuration, generating an ephemeral key when none is set.
    pub fn from_config(config: &AuthConfig) -> Result<Self, MiseError> {
        let keypair = match &config.signing_key {
            Some(seed) => SigningKeypair::from_hex(seed)?,
            None => {
                warn!("auth.signing_key not set; tokens will not survive a restart");
                SigningKeypair::generate()
            }
        };
        Ok(Self::new(keypair, config.token_ttl_secs))
    }

    pub fn keypair(&self) -> &SigningKeypair {
        &self.keypair
    }

    /// Mint a token for `user_id` valid from now for the configured lifetime.
    pub fn issue(&self, user_id: &str) -> Result<String, MiseError> {
        self.issue_at(user_id, Utc::now().timestamp())
    }

    fn issue_at(&self, user_id: &str, now: i64) -> Result<String, MiseError> {
        if user_id.trim().is_empty() {
            return Err(MiseError::Validation { field: "User ID" });
        }
        token::encode(
            &self.keypair,
            &SessionClaims {
                user_id: user_id.to_string(),
                issued_at: now,
                expires_at: now.saturating_add(self.ttl_secs),
            },
        )
    }
}

#[async_trait]
impl PluginAdapter for TokenAuthAdapter {
    fn name(&self) -> &str {
        "token-auth"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Auth
    }

    async fn health_check(&self) -> Result<HealthStatus, MiseError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MiseError> {
        Ok(())
    }
}

#[async_trait]
impl AuthAdapter for TokenAuthAdapter {
    async fn authenticate(&self, token: AuthToken) -> Result<AuthIdentity, MiseError> {
        let claims = token::decode(&self.keypair, &token.token, Utc::now().timestamp())?;
        debug!(user_id = %claims.user_id, "token authenticated");
        Ok(AuthIdentity {
            user_id: UserId(claims.user_id),
            expires_at: claims.expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn issued_token_authenticates() {
        let adapter = TokenAuthAdapter::new(SigningKeypair::generate(), 7200);
        let token = adapter.issue("u1").unwrap();

        let identity = adapter.authenticate(AuthToken { token }).await.unwrap();
        assert_eq!(identity.user_id, UserId("u1".into()));
        assert!(identity.expires_at > Utc::now().timestamp());
    }

    #[tokio::test]
    async fn stale_token_is_rejected() {
        let adapter = TokenAuthAdapter::new(SigningKeypair::generate(), 60);
        let token = adapter.issue_at("u1", Utc::now().timestamp() - 120).unwrap();
        let err = adapter.authenticate(AuthToken { token }).await.unwrap_err();
        assert!(matches!(err, MiseError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn configured_key_is_stable_across_instances() {
        let seed = SigningKeypair::generate().seed_hex();
        let config = AuthConfig {
            signing_key: Some(seed),
            token_ttl_secs: 600,
        };
        let first = TokenAuthAdapter::from_config(&config).unwrap();
        let second = TokenAuthAdapter::from_config(&config).unwrap();

        let token = first.issue("u9").unwrap();
        let identity = second.authenticate(AuthToken { token }).await.unwrap();
        assert_eq!(identity.user_id, UserId("u9".into()));
    }

    #[test]
    fn blank_user_cannot_be_issued() {
        let adapter = TokenAuthAdapter::new(SigningKeypair::generate(), 60);
        assert!(adapter.issue("  ").is_err());
    }

    #[test]
    fn adapter_name_and_type() {
        let adapter = TokenAuthAdapter::from_config(&AuthConfig::default()).unwrap();
        assert_eq!(adapter.name(), "token-auth");
        assert_eq!(adapter.adapter_type(), AdapterType::Auth);
    }
}
