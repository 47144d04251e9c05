use std::{path::PathBuf, time::Duration};

use ytdlp_bindings::YtDlpError;

use crate::types::Stage;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("yt-dlp error: {0}")]
    YtDlp(#[from] YtDlpError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Fetched audio is missing or empty: {0}")]
    EmptyAudio(PathBuf),
    #[error("Download was cancelled")]
    Cancelled,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Upload was cancelled")]
    Cancelled,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Submission was cancelled")]
    Cancelled,
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Transcription failed: {}", .0.as_deref().unwrap_or("no reason given"))]
    Failed(Option<String>),
    #[error("Transcription completed without text")]
    EmptyTranscript,
    #[error("Transcription did not finish within {0:?}")]
    TimedOut(Duration),
    #[error("Transcription polling was cancelled")]
    Cancelled,
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("No content in response")]
    EmptyResponse,
    #[error("Generation was cancelled")]
    Cancelled,
}

/// Failure of a single pipeline stage.
///
/// The `Display` output is the fixed, caller-facing reason for the stage; the
/// wrapped stage error is kept as the `source` for logs.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("{}", Stage::Fetch.failure_reason())]
    Fetch(#[source] FetchError),
    #[error("{}", Stage::Upload.failure_reason())]
    Upload(#[source] UploadError),
    #[error("{}", Stage::Submit.failure_reason())]
    Submit(#[source] SubmitError),
    #[error("{}", Stage::Poll.failure_reason())]
    Transcription(#[source] TranscriptionError),
    #[error("{}", Stage::Generate.failure_reason())]
    Generation(#[source] GenerationError),
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Fetch(_) => Stage::Fetch,
            PipelineError::Upload(_) => Stage::Upload,
            PipelineError::Submit(_) => Stage::Submit,
            PipelineError::Transcription(_) => Stage::Poll,
            PipelineError::Generation(_) => Stage::Generate,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}
