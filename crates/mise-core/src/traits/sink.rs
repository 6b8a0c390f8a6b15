// SPDX-FileCopyrightText: 2026 Mise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound side of a single client streaming connection.

use async_trait::async_trait;

use crate::error::MiseError;
use crate::types::Frame;

/// Destination for the frames of one generation request.
///
/// A sink is exclusively owned by the request that created it. Once
/// `is_open` reports `false` the client is gone and further frames are
/// pointless.
#[async_trait]
pub trait FrameSink: Send + Sync {
    /// Whether the client is still connected.
    fn is_open(&self) -> bool;

    /// Writes one frame. Fails if the connection dropped mid-write.
    async fn send(&self, frame: Frame) -> Result<(), MiseError>;

    /// Ends the stream. Idempotent.
    async fn close(&self);
}
