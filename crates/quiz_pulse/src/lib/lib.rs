pub mod config;
pub mod error;
mod llm;
mod processor;
pub mod server;
pub mod tracing;
pub mod types;
pub mod yt;

pub use config::Config;
pub use error::{
    ConfigError, FetchError, GenerationError, PipelineError, SubmitError, TranscriptionError,
    UploadError,
};
pub use llm::{assemblyai, gemini};
pub use llm::{
    quiz::QuizGenerator,
    transcriber::{PollConfig, TranscriptStatusResponse, TranscriptionService},
};
pub use processor::{builder::QuizPipelineBuilder, QuizPipeline};
pub use types::{Job, JobState, QuizResult, Stage, TranscriptionStatus};
