// SPDX-FileCopyrightText: 2026 Mise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-request generation pipeline.
//!
//! Stages run in order: Validate -> BuildPrompt -> Invoke -> ExtractText ->
//! Persist -> Stream. The first failing stage ends the request with exactly
//! one error frame; a record is written only after non-empty text exists,
//! and always before the first chunk frame.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use mise_core::MiseError;
use mise_core::traits::{FrameSink, ProviderAdapter, StorageAdapter};
use mise_core::types::{
    Frame, GenerationKind, GenerationRequest, GenerationResult, ProviderRequest, RecordId,
};
use mise_security::{SecretList, redact, snapshot};
use strum::Display;
use tracing::{debug, error, info};

use crate::emitter::{EmitOutcome, StreamSettings, emit};
use crate::prompt::build_prompt;

/// Pipeline stages that can fail a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    /// Required parameters checked.
    Validate,
    /// Upstream provider called (retries live inside the provider).
    Invoke,
    /// Text pulled out of the provider response.
    ExtractText,
    /// Result written to storage.
    Persist,
}

/// Terminal state of one request.
#[derive(Debug)]
pub enum Outcome {
    /// Persisted and fully streamed.
    Completed { record_id: RecordId, chunks: usize },
    /// Persisted, but the client left before the close frame.
    Disconnected { record_id: RecordId, sent: usize },
    /// A stage failed; one error frame was sent if the sink was still open.
    Failed { stage: Stage, error: MiseError },
}

/// Composes provider, storage and emitter for each generation request.
#[derive(Clone)]
pub struct Orchestrator {
    provider: Arc<dyn ProviderAdapter>,
    store: Arc<dyn StorageAdapter>,
    settings: StreamSettings,
    secrets: SecretList,
}

impl Orchestrator {
    /// `secrets` holds values scrubbed from error details before they reach the client.
    pub fn new(
        provider: Arc<dyn ProviderAdapter>,
        store: Arc<dyn StorageAdapter>,
        settings: StreamSettings,
        secrets: SecretList,
    ) -> Self {
        Self {
            provider,
            store,
            settings,
            secrets,
        }
    }

    /// Run one request to completion against `sink`. Never returns an error:
    /// failures become an error frame and an [`Outcome::Failed`].
    pub async fn run(&self, request: GenerationRequest, sink: &dyn FrameSink) -> Outcome {
        let kind = request.kind();
        let record_id = RecordId::generate();
        debug!(request_id = %record_id, %kind, "generation started");

        let record = match self.generate(record_id, request).await {
            Ok(record) => record,
            Err((stage, err)) => {
                error!(%kind, %stage, error = %err, "generation failed");
                self.send_error(kind, sink, &err).await;
                return Outcome::Failed { stage, error: err };
            }
        };

        match emit(sink, &record.result_text, &self.settings).await {
            EmitOutcome::Completed { chunks } => {
                info!(request_id = %record.id, %kind, chunks, "generation streamed");
                Outcome::Completed {
                    record_id: record.id,
                    chunks,
                }
            }
            EmitOutcome::Disconnected { sent } => {
                debug!(request_id = %record.id, %kind, sent, "client left before stream end");
                Outcome::Disconnected {
                    record_id: record.id,
                    sent,
                }
            }
        }
    }

    async fn generate(
        &self,
        id: RecordId,
        request: GenerationRequest,
    ) -> Result<GenerationResult, (Stage, MiseError)> {
        let user_id = request.validate().map_err(|e| (Stage::Validate, e))?;
        let prompt = build_prompt(&request.params);

        let response = self
            .provider
            .complete(ProviderRequest { prompt })
            .await
            .map_err(|e| (Stage::Invoke, e))?;

        let result_text = response
            .text
            .filter(|t| !t.is_empty())
            .ok_or((Stage::ExtractText, MiseError::EmptyResult))?;

        let record = GenerationResult {
            id,
            user_id,
            params: request.params,
            result_text,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        self.store
            .insert_generation(&record)
            .await
            .map_err(|e| (Stage::Persist, e))?;
        debug!(request_id = %record.id, model = %response.model, "generation persisted");

        Ok(record)
    }

    async fn send_error(&self, kind: GenerationKind, sink: &dyn FrameSink, err: &MiseError) {
        let details = redact(&err.to_string(), &snapshot(&self.secrets));
        if sink.is_open() {
            let frame = Frame::Error {
                code: kind.error_code().to_string(),
                details,
            };
            if sink.send(frame).await.is_err() {
                debug!(%kind, "client gone before error frame");
            }
        }
        sink.close().await;
    }
}
