use std::{path::PathBuf, time::Duration};

use crate::error::ConfigError;

/// Runtime configuration, built once at startup and handed to each client.
#[derive(Clone)]
pub struct Config {
    pub assemblyai_api_key: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub workdir: PathBuf,
    pub cookies_path: Option<PathBuf>,
    pub poll_interval: Duration,
    pub poll_timeout: Duration,
}

impl Config {
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);
    pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(30 * 60);
    pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
    pub const DEFAULT_WORKDIR: &str = "/var/tmp/quiz-pulse";

    pub fn new(assemblyai_api_key: impl Into<String>, gemini_api_key: impl Into<String>) -> Self {
        Self {
            assemblyai_api_key: assemblyai_api_key.into(),
            gemini_api_key: gemini_api_key.into(),
            gemini_model: Self::DEFAULT_GEMINI_MODEL.into(),
            workdir: PathBuf::from(Self::DEFAULT_WORKDIR),
            cookies_path: None,
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            poll_timeout: Self::DEFAULT_POLL_TIMEOUT,
        }
    }

    /// Checks every setting and reports all problems in a single error
    pub fn validate(self) -> Result<Self, ConfigError> {
        let mut problems = Vec::new();

        if self.assemblyai_api_key.trim().is_empty() {
            problems.push("ASSEMBLYAI_API_KEY is missing".to_string());
        }
        if self.gemini_api_key.trim().is_empty() {
            problems.push("GEMINI_API_KEY is missing".to_string());
        }
        if self.gemini_model.trim().is_empty() {
            problems.push("Gemini model name is empty".to_string());
        }
        if self.poll_interval.is_zero() {
            problems.push("poll interval must be greater than zero".to_string());
        }
        if self.poll_timeout < self.poll_interval {
            problems.push(format!(
                "poll timeout ({:?}) is shorter than the poll interval ({:?})",
                self.poll_timeout, self.poll_interval
            ));
        }

        if problems.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Invalid(problems))
        }
    }
}

// Keys are never printed
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("assemblyai_api_key", &"<redacted>")
            .field("gemini_api_key", &"<redacted>")
            .field("gemini_model", &self.gemini_model)
            .field("workdir", &self.workdir)
            .field("cookies_path", &self.cookies_path)
            .field("poll_interval", &self.poll_interval)
            .field("poll_timeout", &self.poll_timeout)
            .finish()
    }
}
