// SPDX-FileCopyrightText: 2026 Mise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Security helpers for the Mise generation service.
//!
//! Secret redaction for log output and client-facing error details, plus
//! the TLS policy applied to the upstream base URL.

pub mod redact;
pub mod tls;

pub use redact::{REDACTED, RedactingWriter, SecretList, add_secret, redact, snapshot};
pub use tls::{is_localhost, validate_url};
