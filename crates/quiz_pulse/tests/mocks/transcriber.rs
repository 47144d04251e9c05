use std::{
    collections::VecDeque,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use quiz_pulse::{
    SubmitError, TranscriptStatusResponse, TranscriptionError, TranscriptionService,
    TranscriptionStatus, UploadError,
};
use tokio::time::Instant;

/// One scripted reply to a status query
#[derive(Debug, Clone)]
pub enum StatusReply {
    Status(TranscriptionStatus),
    HttpError(u16),
    /// The query never gets an answer
    Hang,
}

#[derive(Clone)]
pub struct MockTranscriber {
    pub transcript: Option<String>,
    pub transcript_id: String,
    pub script: Arc<Mutex<VecDeque<StatusReply>>>,
    pub upload_calls: Arc<Mutex<Vec<PathBuf>>>,
    pub submit_calls: Arc<Mutex<Vec<String>>>,
    pub status_calls: Arc<Mutex<Vec<(String, Instant)>>>,
    pub fail_upload: Option<u16>,
    pub fail_submit: Option<u16>,
}

impl MockTranscriber {
    /// Completes on the first status query with `transcript`
    pub fn new(transcript: &str) -> Self {
        Self::scripted(
            transcript,
            [StatusReply::Status(TranscriptionStatus::Completed)],
        )
    }

    pub fn scripted(transcript: &str, script: impl IntoIterator<Item = StatusReply>) -> Self {
        Self {
            transcript: Some(transcript.to_string()),
            transcript_id: "abc123".to_string(),
            script: Arc::new(Mutex::new(script.into_iter().collect())),
            upload_calls: Arc::new(Mutex::new(Vec::new())),
            submit_calls: Arc::new(Mutex::new(Vec::new())),
            status_calls: Arc::new(Mutex::new(Vec::new())),
            fail_upload: None,
            fail_submit: None,
        }
    }

    pub fn with_statuses(
        transcript: &str,
        statuses: impl IntoIterator<Item = TranscriptionStatus>,
    ) -> Self {
        Self::scripted(transcript, statuses.into_iter().map(StatusReply::Status))
    }

    pub fn status_call_count(&self) -> usize {
        self.status_calls.lock().unwrap().len()
    }
}

impl TranscriptionService for MockTranscriber {
    const TRANSCRIBER_MODEL: &'static str = "mock-universal";

    async fn upload(&self, audio_path: &Path) -> Result<String, UploadError> {
        self.upload_calls
            .lock()
            .unwrap()
            .push(audio_path.to_path_buf());
        if let Some(status) = self.fail_upload {
            return Err(UploadError::Api {
                status,
                message: "upload rejected".into(),
            });
        }
        Ok("https://cdn.assemblyai.test/upload/lecture".to_string())
    }

    async fn submit(&self, audio_url: &str) -> Result<String, SubmitError> {
        self.submit_calls.lock().unwrap().push(audio_url.to_string());
        if let Some(status) = self.fail_submit {
            return Err(SubmitError::Api {
                status,
                message: "submit rejected".into(),
            });
        }
        Ok(self.transcript_id.clone())
    }

    async fn fetch_status(
        &self,
        transcript_id: &str,
    ) -> Result<TranscriptStatusResponse, TranscriptionError> {
        self.status_calls
            .lock()
            .unwrap()
            .push((transcript_id.to_string(), Instant::now()));

        let reply = self.script.lock().unwrap().pop_front();
        match reply {
            Some(StatusReply::Status(status)) => Ok(TranscriptStatusResponse {
                status,
                text: (status == TranscriptionStatus::Completed)
                    .then(|| self.transcript.clone())
                    .flatten(),
                error: (status == TranscriptionStatus::Error)
                    .then(|| "audio could not be decoded".to_string()),
            }),
            Some(StatusReply::Hang) => std::future::pending().await,
            Some(StatusReply::HttpError(status)) => Err(TranscriptionError::Api {
                status,
                message: "status lookup failed".into(),
            }),
            None => Err(TranscriptionError::Api {
                status: 599,
                message: "status script exhausted".into(),
            }),
        }
    }
}
