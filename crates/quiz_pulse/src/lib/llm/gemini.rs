use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{config::Config, error::GenerationError, llm::quiz::QuizGenerator};

pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text = parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect::<String>();
        (!text.trim().is_empty()).then_some(text)
    }
}

impl GeminiClient {
    const QUIZ_PROMPT: &str = include_str!("./prompts/quiz_0.txt");

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: Self::GENERATION_MODEL.into(),
            base_url: "https://generativelanguage.googleapis.com".into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.gemini_api_key).with_model(&config.gemini_model)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn build_prompt(transcript: &str) -> String {
        Self::QUIZ_PROMPT.replace("{transcript}", transcript)
    }

    pub async fn send_generate_request(
        &self,
        prompt: &str,
    ) -> Result<GenerateContentResponse, GenerationError> {
        let body = GenerateContentRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };

        let resp = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(GenerationError::Api { status, message });
        }

        Ok(resp.json::<GenerateContentResponse>().await?)
    }
}

impl QuizGenerator for GeminiClient {
    const GENERATION_MODEL: &'static str = Config::DEFAULT_GEMINI_MODEL;

    #[tracing::instrument(skip_all, fields(model = %self.model, transcript_len = transcript.len()))]
    async fn generate(&self, transcript: &str) -> Result<String, GenerationError> {
        let prompt = Self::build_prompt(transcript);

        let response = self
            .send_generate_request(&prompt)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to generate quiz"))?;

        response.text().ok_or(GenerationError::EmptyResponse)
    }
}
