// SPDX-FileCopyrightText: 2026 Mise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ed25519 keypair used to sign and verify session tokens.

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use mise_core::MiseError;
use rand::rngs::OsRng;

/// The service's token-signing keypair.
pub struct SigningKeypair {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl SigningKeypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        Self::from_signing_key(SigningKey::generate(&mut OsRng))
    }

    /// Rebuild a keypair from a hex-encoded 32-byte seed.
    pub fn from_hex(seed_hex: &str) -> Result<Self, MiseError> {
        let bytes = hex::decode(seed_hex.trim())
            .map_err(|e| MiseError::Config(format!("signing key is not valid hex: {e}")))?;
        let seed: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            MiseError::Config(format!(
                "signing key must be 32 bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self::from_signing_key(SigningKey::from_bytes(&seed)))
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let verifying_key = VerifyingKey::from(&signing_key);
        Self {
            signing_key,
            verifying_key,
        }
    }

    /// Hex-encoded seed, suitable for `auth.signing_key`.
    pub fn seed_hex(&self) -> String {
        hex::encode(self.signing_key.to_bytes())
    }

    pub fn public_hex(&self) -> String {
        hex::encode(self.verifying_key.to_bytes())
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        self.signing_key.sign(message)
    }

    /// Strict verification; rejects weak public keys and malleable signatures.
    pub fn verify_strict(&self, message: &[u8], signature: &Signature) -> Result<(), MiseError> {
        self.verifying_key
            .verify_strict(message, signature)
            .map_err(|_| MiseError::Unauthorized("invalid token signature".to_string()))
    }
}
