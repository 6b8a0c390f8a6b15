// SPDX-FileCopyrightText: 2026 Mise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret redaction for log output and error details.
//!
//! Two complementary mechanisms:
//! 1. **Regex-based**: catches known secret formats (Google API keys, Bearer tokens).
//! 2. **Exact-match**: catches configured secrets loaded at startup.

use std::io::Write;
use std::sync::{Arc, LazyLock, RwLock};

use regex::Regex;

/// Known secret patterns to redact from output.
static REDACTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Google API keys: AIza followed by 35 url-safe characters.
        r"AIza[0-9A-Za-z_\-]{35}",
        // Bearer tokens in headers.
        r"Bearer\s+[a-zA-Z0-9._\-]{10,}",
        // `key=` query parameters on upstream URLs.
        r"([?&]key=)[^&\s]+",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

/// The redaction placeholder.
pub const REDACTED: &str = "[REDACTED]";

/// Shared list of exact secret values, updatable at runtime.
pub type SecretList = Arc<RwLock<Vec<String>>>;

/// Redact secrets from a string using regex patterns and exact-match values.
pub fn redact(input: &str, secrets: &[String]) -> String {
    // Exact values first, so a configured key is replaced even when its
    // shape does not match any pattern.
    let mut sorted: Vec<&String> = secrets.iter().collect();
    sorted.sort_by_key(|v| std::cmp::Reverse(v.len()));
    let mut result = input.to_string();
    for value in sorted {
        if !value.is_empty() {
            result = result.replace(value.as_str(), REDACTED);
        }
    }

    for pattern in REDACTION_PATTERNS.iter() {
        result = if pattern.captures_len() > 1 {
            pattern
                .replace_all(&result, format!("${{1}}{REDACTED}").as_str())
                .into_owned()
        } else {
            pattern.replace_all(&result, REDACTED).into_owned()
        };
    }

    result
}

/// A writer wrapper that redacts secrets from output.
///
/// Wraps any `Write` implementor and replaces known secret patterns and
/// exact configured values with `[REDACTED]`.
pub struct RedactingWriter<W> {
    inner: W,
    secrets: SecretList,
}

impl<W: Write> RedactingWriter<W> {
    pub fn new(inner: W, secrets: SecretList) -> Self {
        Self { inner, secrets }
    }
}

/// Add a value to a shared redaction list. Empty values and duplicates are ignored.
pub fn add_secret(secrets: &SecretList, value: String) {
    if let Ok(mut values) = secrets.write()
        && !value.is_empty()
        && !values.contains(&value)
    {
        values.push(value);
    }
}

/// Snapshot of a shared redaction list.
pub fn snapshot(secrets: &SecretList) -> Vec<String> {
    secrets.read().map(|v| v.clone()).unwrap_or_default()
}

impl<W: Write> Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let input = String::from_utf8_lossy(buf);
        let secrets = snapshot(&self.secrets);
        let redacted = redact(&input, &secrets);
        self.inner.write_all(redacted.as_bytes())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
