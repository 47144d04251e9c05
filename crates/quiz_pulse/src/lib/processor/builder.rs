use std::time::Duration;

use crate::{
    llm::{
        quiz::QuizGenerator,
        transcriber::{PollConfig, TranscriptionService},
    },
    yt::MediaFetcher,
    QuizPipeline,
};

pub struct QuizPipelineBuilder<F = (), T = (), G = ()> {
    fetcher: F,
    transcriber: T,
    generator: G,
    poll_config: PollConfig,
}

impl QuizPipelineBuilder {
    pub fn new() -> Self {
        Self {
            fetcher: (),
            transcriber: (),
            generator: (),
            poll_config: PollConfig::default(),
        }
    }
}

impl Default for QuizPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<F, T, G> QuizPipelineBuilder<F, T, G> {
    pub fn fetcher<F2: MediaFetcher + Send + Sync + 'static>(
        self,
        fetcher: F2,
    ) -> QuizPipelineBuilder<F2, T, G> {
        QuizPipelineBuilder {
            fetcher,
            transcriber: self.transcriber,
            generator: self.generator,
            poll_config: self.poll_config,
        }
    }

    pub fn transcriber<T2: TranscriptionService + 'static>(
        self,
        transcriber: T2,
    ) -> QuizPipelineBuilder<F, T2, G> {
        QuizPipelineBuilder {
            fetcher: self.fetcher,
            transcriber,
            generator: self.generator,
            poll_config: self.poll_config,
        }
    }

    pub fn generator<G2: QuizGenerator + 'static>(
        self,
        generator: G2,
    ) -> QuizPipelineBuilder<F, T, G2> {
        QuizPipelineBuilder {
            fetcher: self.fetcher,
            transcriber: self.transcriber,
            generator,
            poll_config: self.poll_config,
        }
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_config.interval = interval;
        self
    }

    pub fn poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_config.timeout = timeout;
        self
    }
}

impl<F, T, G> QuizPipelineBuilder<F, T, G>
where
    F: MediaFetcher + Send + Sync + 'static,
    T: TranscriptionService + 'static,
    G: QuizGenerator + 'static,
{
    pub fn build(self) -> QuizPipeline<F, T, G> {
        QuizPipeline {
            fetcher: self.fetcher,
            transcriber: self.transcriber,
            generator: self.generator,
            poll_config: self.poll_config,
        }
    }
}
