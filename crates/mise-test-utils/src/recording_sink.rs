// SPDX-FileCopyrightText: 2026 Mise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Frame sink that records everything written to it.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use mise_core::traits::FrameSink;
use mise_core::types::Frame;
use mise_core::MiseError;

/// Captures frames in order. Optionally "disconnects" after `n` frames.
pub struct RecordingSink {
    frames: Mutex<Vec<Frame>>,
    open: AtomicBool,
    disconnect_after: Option<usize>,
    close_calls: AtomicUsize,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            frames: Mutex::new(Vec::new()),
            open: AtomicBool::new(true),
            disconnect_after: None,
            close_calls: AtomicUsize::new(0),
        }
    }

    /// A sink whose client goes away once `n` frames have been delivered.
    pub fn disconnecting_after(n: usize) -> Self {
        Self {
            disconnect_after: Some(n),
            open: AtomicBool::new(n > 0),
            ..Self::new()
        }
    }

    pub fn frames(&self) -> Vec<Frame> {
        self.frames.lock().map(|f| f.clone()).unwrap_or_default()
    }

    /// Concatenation of every chunk frame's payload.
    pub fn text(&self) -> String {
        self.frames()
            .into_iter()
            .filter_map(|f| match f {
                Frame::Chunk(c) => Some(c),
                _ => None,
            })
            .collect()
    }

    pub fn chunk_count(&self) -> usize {
        self.frames()
            .iter()
            .filter(|f| matches!(f, Frame::Chunk(_)))
            .count()
    }

    pub fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }

    /// Simulate the client hanging up.
    pub fn disconnect(&self) {
        self.open.store(false, Ordering::SeqCst);
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FrameSink for RecordingSink {
    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    async fn send(&self, frame: Frame) -> Result<(), MiseError> {
        if !self.is_open() {
            return Err(MiseError::Internal("client disconnected".to_string()));
        }
        let mut frames = self
            .frames
            .lock()
            .map_err(|_| MiseError::Internal("frame log poisoned".to_string()))?;
        frames.push(frame);
        if self.disconnect_after.is_some_and(|n| frames.len() >= n) {
            self.disconnect();
        }
        Ok(())
    }

    async fn close(&self) {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        self.disconnect();
    }
}
