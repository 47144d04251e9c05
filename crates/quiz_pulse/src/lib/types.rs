use std::{fmt, path::PathBuf};

use serde::Deserialize;

use crate::error::PipelineError;

/// Outcome of a single pipeline run: the raw quiz text or the failed stage.
pub type QuizResult = Result<String, PipelineError>;

/// The sequential pipeline steps, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Fetch,
    Upload,
    Submit,
    Poll,
    Generate,
}

impl Stage {
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Fetch => Some(Stage::Upload),
            Stage::Upload => Some(Stage::Submit),
            Stage::Submit => Some(Stage::Poll),
            Stage::Poll => Some(Stage::Generate),
            Stage::Generate => None,
        }
    }

    /// Caller-facing reason reported when this stage fails
    pub fn failure_reason(self) -> &'static str {
        match self {
            Stage::Fetch => "Failed to download audio",
            Stage::Upload => "Failed to upload audio",
            Stage::Submit => "Failed to start transcription",
            Stage::Poll => "Failed to get transcript",
            Stage::Generate => "Failed to generate quiz",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Fetch => "fetch",
            Stage::Upload => "upload",
            Stage::Submit => "submit",
            Stage::Poll => "poll",
            Stage::Generate => "generate",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptionStatus {
    Queued,
    Processing,
    Completed,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Created,
    Running(Stage),
    Failed(Stage),
    Completed,
}

/// One request travelling through the pipeline.
///
/// A job is owned by the task that runs it and is never shared across requests.
#[derive(Debug, Clone)]
pub struct Job {
    pub source_url: String,
    pub audio_path: Option<PathBuf>,
    pub audio_url: Option<String>,
    pub transcript_id: Option<String>,
    pub transcript: Option<String>,
    pub quiz: Option<String>,
    pub state: JobState,
    pub error: Option<String>,
}

impl Job {
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            audio_path: None,
            audio_url: None,
            transcript_id: None,
            transcript: None,
            quiz: None,
            state: JobState::Created,
            error: None,
        }
    }

    /// The stage that must run next, or `None` once the job is terminal
    pub fn expected_stage(&self) -> Option<Stage> {
        match self.state {
            JobState::Created => Some(Stage::Fetch),
            JobState::Running(stage) => stage.next(),
            JobState::Failed(_) | JobState::Completed => None,
        }
    }

    /// Moves the job into `stage`. Stages can only be entered in order, once.
    pub(crate) fn enter(&mut self, stage: Stage) {
        debug_assert_eq!(
            self.expected_stage(),
            Some(stage),
            "stage {stage} entered out of order from {:?}",
            self.state
        );
        self.state = JobState::Running(stage);
    }

    pub(crate) fn fail(&mut self, error: &PipelineError) {
        self.state = JobState::Failed(error.stage());
        self.error = Some(error.to_string());
    }

    pub(crate) fn complete(&mut self) {
        self.state = JobState::Completed;
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.state, JobState::Failed(_) | JobState::Completed)
    }
}
