use std::path::Path;

use reqwest::{Body, Client, Response, StatusCode};
use serde::Deserialize;
use tokio_util::io::ReaderStream;

use crate::{
    config::Config,
    error::{SubmitError, TranscriptionError, UploadError},
    llm::transcriber::{TranscriptStatusResponse, TranscriptionService},
};

pub struct AssemblyAIClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    upload_url: String,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    id: String,
}

impl AssemblyAIClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.assemblyai.com".into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.assemblyai_api_key)
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Splits a non-200 response into its status code and body
async fn api_failure(resp: Response) -> (u16, String) {
    let status = resp.status().as_u16();
    let message = resp.text().await.unwrap_or_default();
    (status, message)
}

impl TranscriptionService for AssemblyAIClient {
    const TRANSCRIBER_MODEL: &'static str = "assemblyai-universal";

    #[tracing::instrument(skip(self))]
    async fn upload(&self, audio_path: &Path) -> Result<String, UploadError> {
        let file = tokio::fs::File::open(audio_path).await?;
        let body = Body::wrap_stream(ReaderStream::new(file));

        let resp = self
            .client
            .post(format!("{}/v2/upload", self.base_url))
            .header("authorization", &self.api_key)
            .header("content-type", "application/octet-stream")
            .body(body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if resp.status() != StatusCode::OK {
            let (status, message) = api_failure(resp).await;
            tracing::error!(status, %message, "Upload failed");
            return Err(UploadError::Api { status, message });
        }

        let upload = resp.json::<UploadResponse>().await?;
        tracing::info!("Audio uploaded");
        Ok(upload.upload_url)
    }

    #[tracing::instrument(skip(self))]
    async fn submit(&self, audio_url: &str) -> Result<String, SubmitError> {
        let body = serde_json::json!({ "audio_url": audio_url });

        let resp = self
            .client
            .post(format!("{}/v2/transcript", self.base_url))
            .header("authorization", &self.api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if resp.status() != StatusCode::OK {
            let (status, message) = api_failure(resp).await;
            tracing::error!(status, %message, "Transcription request failed");
            return Err(SubmitError::Api { status, message });
        }

        let submitted = resp.json::<SubmitResponse>().await?;
        tracing::info!(transcript_id = %submitted.id, "Transcription started");
        Ok(submitted.id)
    }

    async fn fetch_status(
        &self,
        transcript_id: &str,
    ) -> Result<TranscriptStatusResponse, TranscriptionError> {
        let resp = self
            .client
            .get(format!("{}/v2/transcript/{transcript_id}", self.base_url))
            .header("authorization", &self.api_key)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if resp.status() != StatusCode::OK {
            let (status, message) = api_failure(resp).await;
            tracing::error!(status, %message, "Failed to check transcription status");
            return Err(TranscriptionError::Api { status, message });
        }

        Ok(resp.json::<TranscriptStatusResponse>().await?)
    }
}
