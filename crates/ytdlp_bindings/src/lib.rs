//! # yt-dlp bindings
//!
//! Async wrapper around the `yt-dlp` executable. Audio extraction and
//! transcoding are delegated to yt-dlp, which drives ffmpeg internally.

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::{ExitStatus, Stdio},
};

use tokio::process::Command;

#[derive(Debug, thiserror::Error)]
pub enum YtDlpError {
    #[error("yt-dlp executable not found: {0}")]
    NotFound(#[from] which::Error),
    #[error("Failed to run yt-dlp: {0}")]
    Io(#[from] std::io::Error),
    #[error("yt-dlp exited with {status}: {stderr}")]
    Failed { status: ExitStatus, stderr: String },
    #[error("yt-dlp did not report an output file")]
    NoOutput,
}

#[derive(Debug, Clone)]
pub struct YtDlp {
    binary: PathBuf,
    cookies_path: Option<PathBuf>,
}

impl YtDlp {
    /// Locates `yt-dlp` on `PATH`
    pub fn new() -> Result<Self, YtDlpError> {
        Self::new_with_cookies(None)
    }

    pub fn new_with_cookies(cookies_path: Option<PathBuf>) -> Result<Self, YtDlpError> {
        let binary = which::which("yt-dlp")?;
        Ok(Self {
            binary,
            cookies_path,
        })
    }

    /// Uses an explicit executable instead of searching `PATH`
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            cookies_path: None,
        }
    }

    fn audio_args(
        &self,
        url: &str,
        format: &str,
        quality: &str,
        output_template: &Path,
    ) -> Vec<OsString> {
        let mut args: Vec<OsString> = [
            "-f",
            "bestaudio/best",
            "--extract-audio",
            "--audio-format",
            format,
            "--audio-quality",
            quality,
            "--no-playlist",
            "--restrict-filenames",
            "--no-progress",
            "--print",
            "after_move:filepath",
            "--no-simulate",
        ]
        .into_iter()
        .map(OsString::from)
        .collect();

        if let Some(cookies) = &self.cookies_path {
            args.push("--cookies".into());
            args.push(cookies.into());
        }

        args.push("-o".into());
        args.push(output_template.into());
        args.push(url.into());
        args
    }

    /// Downloads the best available audio stream of `url` and transcodes it to `format`.
    ///
    /// `output_template` is a yt-dlp output template, e.g. `/tmp/%(title)s.%(ext)s`.
    /// Returns the path of the final transcoded file as reported by yt-dlp.
    pub async fn download_audio(
        &self,
        url: &str,
        format: &str,
        quality: &str,
        output_template: impl AsRef<Path>,
    ) -> Result<PathBuf, YtDlpError> {
        let args = self.audio_args(url, format, quality, output_template.as_ref());
        tracing::debug!(binary = ?self.binary, ?args, "Spawning yt-dlp");

        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(YtDlpError::Failed {
                status: output.status,
                stderr,
            });
        }

        // `--print after_move:filepath` writes the final path as the last stdout line
        String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .last()
            .map(PathBuf::from)
            .ok_or(YtDlpError::NoOutput)
    }
}
