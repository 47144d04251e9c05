use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use ytdlp_bindings::YtDlp;

use quiz_pulse::{
    assemblyai::AssemblyAIClient,
    gemini::GeminiClient,
    server::{create_router, AppState},
    tracing::init_tracing_subscriber,
    yt::audio_handler::YtDlpWrapper,
    Config, Job, QuizGenerator, QuizPipeline, QuizPipelineBuilder,
};

#[derive(Parser)]
#[command(name = "quiz-pulse", about = "Turns a video into a multiple-choice quiz")]
struct Cli {
    /// AssemblyAI API key
    #[arg(long, env = "ASSEMBLYAI_API_KEY", hide_env_values = true)]
    assemblyai_key: String,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    gemini_key: String,

    /// Gemini model used for quiz generation
    #[arg(long, env = "GEMINI_MODEL", default_value = GeminiClient::GENERATION_MODEL)]
    gemini_model: String,

    /// Path to yt-dlp cookies file
    #[arg(long, env = "YTDLP_COOKIES_PATH")]
    cookies_path: Option<PathBuf>,

    /// Working directory for downloaded audio
    #[arg(long, env = "QUIZ_PULSE_WORKDIR", default_value = Config::DEFAULT_WORKDIR)]
    workdir: PathBuf,

    /// Seconds between transcription status checks
    #[arg(long, env = "POLL_INTERVAL_SECS", default_value = "10")]
    poll_interval_secs: u64,

    /// Give up on a transcription after this many seconds
    #[arg(long, env = "POLL_TIMEOUT_SECS", default_value = "1800")]
    poll_timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the quiz endpoint over HTTP
    Serve {
        #[arg(long, env = "HOST", default_value = "127.0.0.1")]
        host: String,
        #[arg(long, env = "PORT", default_value = "5000")]
        port: u16,
    },
    /// Run the pipeline once for a single video and print the quiz
    Run {
        #[arg(long)]
        url: String,
    },
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            assemblyai_api_key: self.assemblyai_key.clone(),
            gemini_api_key: self.gemini_key.clone(),
            gemini_model: self.gemini_model.clone(),
            workdir: self.workdir.clone(),
            cookies_path: self.cookies_path.clone(),
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            poll_timeout: Duration::from_secs(self.poll_timeout_secs),
        }
    }
}

type Pipeline = QuizPipeline<YtDlpWrapper, AssemblyAIClient, GeminiClient>;

fn build_pipeline(config: &Config) -> anyhow::Result<Pipeline> {
    let yt_dlp = YtDlp::new_with_cookies(config.cookies_path.clone())
        .context("yt-dlp is required to fetch audio")?;

    Ok(QuizPipelineBuilder::new()
        .fetcher(YtDlpWrapper::new(yt_dlp, config.workdir.join("audio")))
        .transcriber(AssemblyAIClient::from_config(config))
        .generator(GeminiClient::from_config(config))
        .poll_interval(config.poll_interval)
        .poll_timeout(config.poll_timeout)
        .build())
}

async fn serve(pipeline: Pipeline, host: &str, port: u16) -> anyhow::Result<()> {
    let shutdown = CancellationToken::new();
    let state = AppState {
        pipeline: Arc::new(pipeline),
        shutdown: shutdown.clone(),
    };
    let app = create_router(state);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("Invalid listen address {host}:{port}"))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(%addr, "Quiz server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown requested, cancelling in-flight jobs");
            shutdown.cancel();
        })
        .await?;

    Ok(())
}

async fn run_once(pipeline: Pipeline, url: &str) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        ctrl_c.cancel();
    });

    let mut job = Job::new(url);
    let result = pipeline.execute(&mut job, &cancel).await;

    if let Some(transcript) = &job.transcript {
        println!("\nTranscript:\n{transcript}");
    }

    match result {
        Ok(quiz) => {
            println!("\nQuiz:\n{quiz}");
            Ok(())
        }
        Err(e) => Err(anyhow::Error::new(e).context(format!("Job for {url} failed"))),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some("production".into()),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    let config = cli.config().validate()?;
    tracing::info!(?config, "Configuration loaded");

    let pipeline = build_pipeline(&config)?;

    match cli.command {
        Command::Serve { host, port } => serve(pipeline, &host, port).await?,
        Command::Run { url } => run_once(pipeline, &url).await?,
    }

    Ok(())
}
