use std::{future::Future, path::Path, time::Duration};

use serde::Deserialize;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::{
    error::{SubmitError, TranscriptionError, UploadError},
    types::TranscriptionStatus,
};

/// Snapshot of a remote transcription job
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptStatusResponse {
    pub status: TranscriptionStatus,
    pub text: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    /// Wait between two status queries that show no progress
    pub interval: Duration,
    /// Upper bound on the whole polling phase
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            timeout: Duration::from_secs(30 * 60),
        }
    }
}

/// A remote speech-to-text service with an upload / submit / poll workflow.
pub trait TranscriptionService: Send + Sync {
    const TRANSCRIBER_MODEL: &'static str;

    /// Sends the raw audio bytes and returns the service-side URL of the upload
    fn upload(&self, audio_path: &Path) -> impl Future<Output = Result<String, UploadError>> + Send;

    /// Starts transcription of a previously uploaded file and returns the job id
    fn submit(&self, audio_url: &str) -> impl Future<Output = Result<String, SubmitError>> + Send;

    /// Queries the current state of a transcription job once
    fn fetch_status(
        &self,
        transcript_id: &str,
    ) -> impl Future<Output = Result<TranscriptStatusResponse, TranscriptionError>> + Send;

    /// Queries the job until it reaches a terminal status.
    ///
    /// `queued` and `processing` sleep for `config.interval` and query again. `completed`
    /// yields the transcript, `error` and any failed query end polling at once. The
    /// whole phase, including a query still in flight, is bounded by `config.timeout`
    /// and stops early when `cancel` fires.
    fn poll(
        &self,
        transcript_id: &str,
        config: PollConfig,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<String, TranscriptionError>> + Send {
        async move {
            let started = Instant::now();
            let deadline = started + config.timeout;

            loop {
                let response = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(TranscriptionError::Cancelled),
                    response = self.fetch_status(transcript_id) => response?,
                    _ = tokio::time::sleep_until(deadline) => {
                        tracing::warn!(transcript_id, "Status query outlived the polling deadline");
                        return Err(TranscriptionError::TimedOut(started.elapsed()));
                    }
                };

                match response.status {
                    TranscriptionStatus::Completed => {
                        return match response.text {
                            Some(text) if !text.trim().is_empty() => Ok(text),
                            _ => Err(TranscriptionError::EmptyTranscript),
                        };
                    }
                    TranscriptionStatus::Error => {
                        tracing::error!(transcript_id, reason = ?response.error, "Transcription failed");
                        return Err(TranscriptionError::Failed(response.error));
                    }
                    status @ (TranscriptionStatus::Queued | TranscriptionStatus::Processing) => {
                        let next_query = Instant::now() + config.interval;
                        if next_query > deadline {
                            tracing::warn!(transcript_id, ?status, "Transcription polling timed out");
                            return Err(TranscriptionError::TimedOut(started.elapsed()));
                        }

                        tracing::info!(transcript_id, ?status, "Transcription pending, waiting");
                        tokio::select! {
                            biased;
                            _ = cancel.cancelled() => return Err(TranscriptionError::Cancelled),
                            _ = tokio::time::sleep_until(next_query) => {}
                        }
                    }
                }
            }
        }
    }
}
