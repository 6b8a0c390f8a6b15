// SPDX-FileCopyrightText: 2026 Mise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Paced re-chunking of a finished text onto a [`FrameSink`].

use std::time::Duration;

use mise_config::model::StreamConfig;
use mise_core::traits::FrameSink;
use mise_core::types::Frame;
use tracing::debug;

/// Chunk size and inter-frame pacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSettings {
    /// Maximum characters per chunk frame.
    pub chunk_size: usize,
    pub frame_delay: Duration,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            chunk_size: 80,
            frame_delay: Duration::from_millis(30),
        }
    }
}

impl From<&StreamConfig> for StreamSettings {
    fn from(config: &StreamConfig) -> Self {
        Self {
            chunk_size: config.chunk_size,
            frame_delay: Duration::from_millis(config.frame_delay_ms),
        }
    }
}

/// How an emission ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitOutcome {
    /// Every chunk and the close frame were delivered.
    Completed { chunks: usize },
    /// The sink stopped accepting frames after `sent` chunks.
    Disconnected { sent: usize },
}

/// Split `text` into pieces of at most `size` characters.
///
/// Counts Unicode scalar values, so a code point is never split.
pub fn chunk_text(text: &str, size: usize) -> Vec<&str> {
    let size = size.max(1);
    let mut chunks = Vec::with_capacity(text.len().div_ceil(size));
    let mut start = 0;
    for (count, (idx, _)) in text.char_indices().enumerate() {
        if count > 0 && count % size == 0 {
            chunks.push(&text[start..idx]);
            start = idx;
        }
    }
    if start < text.len() {
        chunks.push(&text[start..]);
    }
    chunks
}

/// Send `text` as chunk frames followed by a close frame, then close the sink.
///
/// Checks the sink before every frame and stops quietly once it is gone.
pub async fn emit(sink: &dyn FrameSink, text: &str, settings: &StreamSettings) -> EmitOutcome {
    let chunks = chunk_text(text, settings.chunk_size);
    let total = chunks.len();

    for (sent, chunk) in chunks.into_iter().enumerate() {
        if !sink.is_open() || sink.send(Frame::Chunk(chunk.to_string())).await.is_err() {
            debug!(sent, total, "client disconnected mid-stream");
            return EmitOutcome::Disconnected { sent };
        }
        tokio::time::sleep(settings.frame_delay).await;
    }

    if !sink.is_open() || sink.send(Frame::Close).await.is_err() {
        debug!(sent = total, "client disconnected before close frame");
        return EmitOutcome::Disconnected { sent: total };
    }
    sink.close().await;

    EmitOutcome::Completed { chunks: total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mise_test_utils::RecordingSink;
    use proptest::prelude::*;

    #[test]
    fn chunks_respect_size_and_order() {
        let text = "a".repeat(200);
        let chunks = chunk_text(&text, 80);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 80);
        assert_eq!(chunks[2].len(), 40);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn chunks_borrow_from_the_source_text() {
        let text = "ab".repeat(50);
        let chunks = chunk_text(&text, 80);
        assert_eq!(chunks.len(), 2);
        assert!(std::ptr::eq(chunks[0].as_ptr(), text.as_ptr()));
        assert!(std::ptr::eq(chunks[1].as_ptr(), text[80..].as_ptr()));
    }

    #[test]
    fn empty_text_has_no_chunks() {
        assert!(chunk_text("", 80).is_empty());
    }

    #[test]
    fn multibyte_characters_are_not_split() {
        let text = "é".repeat(5);
        let chunks = chunk_text(&text, 2);
        assert_eq!(chunks, vec!["éé", "éé", "é"]);
    }

    proptest! {
        #[test]
        fn chunking_preserves_text_and_bounds(text in "\\PC{0,600}", size in 1usize..120) {
            let chunks = chunk_text(&text, size);
            let len = text.chars().count();
            prop_assert_eq!(chunks.len(), len.div_ceil(size));
            prop_assert!(chunks.iter().all(|c| c.chars().count() <= size));
            prop_assert!(chunks.iter().all(|c| !c.is_empty()));
            prop_assert_eq!(chunks.concat(), text);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn emits_chunks_then_close_with_pacing() {
        let sink = RecordingSink::new();
        let text = "x".repeat(200);
        let started = tokio::time::Instant::now();

        let outcome = emit(&sink, &text, &StreamSettings::default()).await;

        assert_eq!(outcome, EmitOutcome::Completed { chunks: 3 });
        let frames = sink.frames();
        assert_eq!(frames.len(), 4);
        assert_eq!(frames.last(), Some(&Frame::Close));
        assert_eq!(sink.text(), text);
        assert_eq!(sink.close_calls(), 1);
        assert!(started.elapsed() >= Duration::from_millis(90));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_text_sends_only_close() {
        let sink = RecordingSink::new();
        let outcome = emit(&sink, "", &StreamSettings::default()).await;
        assert_eq!(outcome, EmitOutcome::Completed { chunks: 0 });
        assert_eq!(sink.frames(), vec![Frame::Close]);
    }

    #[tokio::test(start_paused = true)]
    async fn stops_quietly_when_client_leaves() {
        let sink = RecordingSink::disconnecting_after(2);
        let outcome = emit(&sink, &"y".repeat(400), &StreamSettings::default()).await;

        assert_eq!(outcome, EmitOutcome::Disconnected { sent: 2 });
        assert_eq!(sink.chunk_count(), 2);
        assert!(!sink.frames().contains(&Frame::Close));
        assert_eq!(sink.close_calls(), 0);
    }

    #[test]
    fn settings_follow_stream_config() {
        let config = StreamConfig {
            chunk_size: 16,
            frame_delay_ms: 5,
            ..StreamConfig::default()
        };
        let settings = StreamSettings::from(&config);
        assert_eq!(settings.chunk_size, 16);
        assert_eq!(settings.frame_delay, Duration::from_millis(5));
    }
}
