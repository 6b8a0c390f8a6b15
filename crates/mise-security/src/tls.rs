// SPDX-FileCopyrightText: 2026 Mise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! TLS policy for the upstream generation endpoint.
//!
//! The API key travels in a request header, so remote upstreams must be
//! reached over HTTPS. Loopback hosts are exempt for local testing.

use mise_core::MiseError;
use tracing::error;

/// Validate a base URL for security policy compliance.
///
/// - Localhost URLs (127.0.0.1, ::1, localhost) are allowed with any scheme.
/// - Remote URLs MUST use HTTPS.
pub fn validate_url(url: &str) -> Result<(), MiseError> {
    let parsed =
        url::Url::parse(url).map_err(|e| MiseError::Config(format!("invalid URL: {e}")))?;

    let host = parsed.host_str().unwrap_or("");
    if is_localhost(host) {
        return Ok(());
    }

    if parsed.scheme() != "https" {
        error!(url = %url, "TLS required for remote upstream");
        return Err(MiseError::Config(
            "TLS required for remote upstream -- use HTTPS".to_string(),
        ));
    }

    Ok(())
}

/// Check if a host refers to localhost.
pub fn is_localhost(host: &str) -> bool {
    matches!(host, "127.0.0.1" | "::1" | "localhost" | "[::1]") || host.starts_with("127.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn https_remote_is_accepted() {
        assert!(validate_url("https://generativelanguage.googleapis.com/v1beta").is_ok());
    }

    #[test]
    fn http_remote_is_rejected() {
        let err = validate_url("http://generativelanguage.googleapis.com/v1beta").unwrap_err();
        assert!(err.to_string().contains("TLS required"));
    }

    #[test]
    fn http_localhost_is_allowed() {
        assert!(validate_url("http://127.0.0.1:8080").is_ok());
        assert!(validate_url("http://localhost:3000/v1beta").is_ok());
        assert!(validate_url("http://[::1]:9000").is_ok());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(validate_url("not a url").is_err());
    }

    #[test]
    fn localhost_detection() {
        assert!(is_localhost("127.0.0.2"));
        assert!(!is_localhost("10.0.0.1"));
    }
}
