// SPDX-FileCopyrightText: 2026 Mise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Server-Sent Events transport for generation streams.
//!
//! The orchestrator writes [`Frame`]s into an [`SseSink`]; the HTTP response
//! drains the paired receiver. Each frame becomes one `data: <json>` event.
//! When the client goes away axum drops the response stream, the receiver
//! closes, and the sink reports itself closed.

use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use axum::http::header;
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use futures::stream::{self, Stream};
use tokio::sync::mpsc;
use tracing::debug;

use mise_core::MiseError;
use mise_core::traits::FrameSink;
use mise_core::types::{Frame, GenerationRequest};

use crate::server::GatewayState;

/// [`FrameSink`] backed by a bounded mpsc channel.
pub struct SseSink {
    tx: mpsc::Sender<Frame>,
    closed: AtomicBool,
}

impl SseSink {
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<Frame>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (
            Self {
                tx,
                closed: AtomicBool::new(false),
            },
            rx,
        )
    }
}

#[async_trait]
impl FrameSink for SseSink {
    fn is_open(&self) -> bool {
        !self.closed.load(Ordering::SeqCst) && !self.tx.is_closed()
    }

    async fn send(&self, frame: Frame) -> Result<(), MiseError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(MiseError::Internal("stream already closed".into()));
        }
        self.tx
            .send(frame)
            .await
            .map_err(|_| MiseError::Internal("client disconnected".into()))
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Turn the receiving half into an SSE event stream.
pub fn frame_stream(
    rx: mpsc::Receiver<Frame>,
) -> impl Stream<Item = Result<Event, Infallible>> + Send + 'static {
    stream::unfold(rx, |mut rx| async move {
        let frame = rx.recv().await?;
        Some((Ok(Event::default().data(frame.to_json())), rx))
    })
}

/// Start a generation in the background and return its event stream.
///
/// The response carries `text/event-stream`, `no-cache` and keep-alive
/// headers; the orchestrator task owns the sink, so the stream ends when
/// the task finishes.
pub fn stream_generation(state: &GatewayState, request: GenerationRequest) -> Response {
    let (sink, rx) = SseSink::channel(state.stream_buffer);
    let orchestrator = state.orchestrator.clone();

    tokio::spawn(async move {
        let kind = request.kind();
        let outcome = orchestrator.run(request, &sink).await;
        debug!(%kind, ?outcome, "generation task finished");
    });

    (
        [
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
        ],
        Sse::new(frame_stream(rx)),
    )
        .into_response()
}
