// SPDX-FileCopyrightText: 2026 Mise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Signed session tokens.
//!
//! Wire form: `hex(claims_json) "." hex(signature)`, where the signature
//! covers the exact claims bytes.

use ed25519_dalek::Signature;
use mise_core::MiseError;
use serde::{Deserialize, Serialize};

use crate::keypair::SigningKeypair;

/// Claims carried by a session token. Timestamps are Unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub user_id: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

/// Sign `claims` into a bearer token string.
pub fn encode(keypair: &SigningKeypair, claims: &SessionClaims) -> Result<String, MiseError> {
    let payload = serde_json::to_vec(claims)
        .map_err(|e| MiseError::Internal(format!("failed to serialize claims: {e}")))?;
    let signature = keypair.sign(&payload);
    Ok(format!(
        "{}.{}",
        hex::encode(&payload),
        hex::encode(signature.to_bytes())
    ))
}

/// Verify a token's signature and expiry against `now`.
pub fn decode(keypair: &SigningKeypair, token: &str, now: i64) -> Result<SessionClaims, MiseError> {
    let malformed = || MiseError::Unauthorized("malformed token".to_string());

    let (payload_hex, signature_hex) = token.trim().split_once('.').ok_or_else(malformed)?;
    let payload = hex::decode(payload_hex).map_err(|_| malformed())?;
    let signature_bytes: [u8; 64] = hex::decode(signature_hex)
        .map_err(|_| malformed())?
        .as_slice()
        .try_into()
        .map_err(|_| malformed())?;

    keypair.verify_strict(&payload, &Signature::from_bytes(&signature_bytes))?;

    let claims: SessionClaims = serde_json::from_slice(&payload).map_err(|_| malformed())?;
    if claims.user_id.is_empty() {
        return Err(malformed());
    }
    if now >= claims.expires_at {
        return Err(MiseError::Unauthorized("token expired".to_string()));
    }
    Ok(claims)
}
