pub mod builder;

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::{
    error::{FetchError, GenerationError, PipelineError, SubmitError, UploadError},
    llm::{
        quiz::QuizGenerator,
        transcriber::{PollConfig, TranscriptionService},
    },
    types::{Job, QuizResult, Stage},
    yt::MediaFetcher,
};

/// Runs a single video through fetch → upload → submit → poll → generate.
///
/// The pipeline holds no per-job state, so one instance can serve many
/// concurrent requests; each run owns its own [`Job`].
#[derive(Debug)]
pub struct QuizPipeline<F, T, G>
where
    F: MediaFetcher + Send + Sync + 'static,
    T: TranscriptionService + 'static,
    G: QuizGenerator + 'static,
{
    pub(crate) fetcher: F,
    pub(crate) transcriber: T,
    pub(crate) generator: G,
    pub(crate) poll_config: PollConfig,
}

impl<F, T, G> QuizPipeline<F, T, G>
where
    F: MediaFetcher + Send + Sync + 'static,
    T: TranscriptionService + 'static,
    G: QuizGenerator + 'static,
{
    /// Runs the pipeline for `url` until it finishes
    pub async fn run(&self, url: &str) -> QuizResult {
        self.run_with_cancel(url, &CancellationToken::new()).await
    }

    pub async fn run_with_cancel(&self, url: &str, cancel: &CancellationToken) -> QuizResult {
        let mut job = Job::new(url);
        self.execute(&mut job, cancel).await
    }

    /// Drives `job` through every stage, stopping at the first failure.
    ///
    /// The job is left in its terminal state so callers can inspect how far it got.
    #[tracing::instrument(skip_all, fields(url = %job.source_url))]
    pub async fn execute(&self, job: &mut Job, cancel: &CancellationToken) -> QuizResult {
        tracing::info!(
            audio_format = F::AUDIO_FORMAT,
            transcriber = T::TRANSCRIBER_MODEL,
            "Starting job"
        );

        match self.execute_stages(job, cancel).await {
            Ok(quiz) => {
                job.complete();
                tracing::info!(quiz_len = quiz.len(), "Quiz generated");
                Ok(quiz)
            }
            Err(e) => {
                job.fail(&e);
                tracing::error!(stage = %e.stage(), error = ?e, "Pipeline stopped");
                Err(e)
            }
        }
    }

    async fn execute_stages(
        &self,
        job: &mut Job,
        cancel: &CancellationToken,
    ) -> Result<String, PipelineError> {
        job.enter(Stage::Fetch);
        let audio_path = until_cancelled(cancel, self.fetcher.fetch(&job.source_url))
            .await
            .unwrap_or(Err(FetchError::Cancelled))
            .map_err(PipelineError::Fetch)?;
        job.audio_path = Some(audio_path.clone());

        job.enter(Stage::Upload);
        let audio_url = until_cancelled(cancel, self.transcriber.upload(&audio_path))
            .await
            .unwrap_or(Err(UploadError::Cancelled))
            .map_err(PipelineError::Upload)?;
        job.audio_url = Some(audio_url.clone());

        job.enter(Stage::Submit);
        let transcript_id = until_cancelled(cancel, self.transcriber.submit(&audio_url))
            .await
            .unwrap_or(Err(SubmitError::Cancelled))
            .map_err(PipelineError::Submit)?;
        job.transcript_id = Some(transcript_id.clone());

        job.enter(Stage::Poll);
        let transcript = self
            .transcriber
            .poll(&transcript_id, self.poll_config, cancel)
            .await
            .map_err(PipelineError::Transcription)?;
        job.transcript = Some(transcript.clone());

        job.enter(Stage::Generate);
        let quiz = until_cancelled(cancel, self.generator.generate(&transcript))
            .await
            .unwrap_or(Err(GenerationError::Cancelled))
            .map_err(PipelineError::Generation)?;
        job.quiz = Some(quiz.clone());

        Ok(quiz)
    }
}

/// Drives `stage` unless `cancel` fires first. A token that is already cancelled
/// never polls `stage`, so no external call is made.
async fn until_cancelled<T>(
    cancel: &CancellationToken,
    stage: impl Future<Output = T>,
) -> Option<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        output = stage => Some(output),
    }
}
