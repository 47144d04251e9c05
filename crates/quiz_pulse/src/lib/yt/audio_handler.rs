use std::{
    ops::Deref,
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
};

use ytdlp_bindings::YtDlp;

use crate::{error::FetchError, yt::MediaFetcher};

pub struct YtDlpWrapper {
    yt_dlp: YtDlp,
    audio_dl_path: PathBuf,
    downloads: AtomicU64,
}

impl YtDlpWrapper {
    const AUDIO_QUALITY: &str = "192K";

    pub fn new(yt_dlp: YtDlp, audio_dl_path: impl Into<PathBuf>) -> Self {
        Self {
            yt_dlp,
            audio_dl_path: audio_dl_path.into(),
            downloads: AtomicU64::new(0),
        }
    }

    pub fn audio_dl_path(&self) -> &Path {
        &self.audio_dl_path
    }

    /// Title-derived output template, unique per download so that concurrent
    /// jobs for the same video never share a file.
    fn output_template(&self) -> PathBuf {
        let n = self.downloads.fetch_add(1, Ordering::Relaxed);
        self.audio_dl_path.join(format!(
            "%(title)s-%(id)s-{}-{n}.%(ext)s",
            std::process::id()
        ))
    }
}

impl Deref for YtDlpWrapper {
    type Target = YtDlp;

    fn deref(&self) -> &Self::Target {
        &self.yt_dlp
    }
}

impl MediaFetcher for YtDlpWrapper {
    const AUDIO_FORMAT: &'static str = "mp3";

    #[tracing::instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<PathBuf, FetchError> {
        tokio::fs::create_dir_all(&self.audio_dl_path).await?;

        let audio_output_template = self.output_template();

        let audio_path = self
            .download_audio(
                url,
                Self::AUDIO_FORMAT,
                Self::AUDIO_QUALITY,
                &audio_output_template,
            )
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to download audio"))?;

        let audio_path = verify_audio(audio_path).await?;
        tracing::info!(path = %audio_path.display(), "Audio downloaded");
        Ok(audio_path)
    }
}

/// Ensures the transcoded file exists and is not empty
async fn verify_audio(audio_path: PathBuf) -> Result<PathBuf, FetchError> {
    match tokio::fs::metadata(&audio_path).await {
        Ok(meta) if meta.is_file() && meta.len() > 0 => Ok(audio_path),
        Ok(_) => Err(FetchError::EmptyAudio(audio_path)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::error!(path = %audio_path.display(), "yt-dlp did not produce expected file");
            Err(FetchError::EmptyAudio(audio_path))
        }
        Err(e) => Err(FetchError::Io(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_verify_audio_accepts_non_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("talk.mp3");
        std::fs::write(&path, b"ID3fake-mp3-bytes").unwrap();

        let verified = verify_audio(path.clone()).await.unwrap();
        assert_eq!(verified, path);
    }

    #[tokio::test]
    async fn test_verify_audio_rejects_empty_and_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.mp3");
        std::fs::write(&empty, b"").unwrap();

        assert!(matches!(
            verify_audio(empty).await,
            Err(FetchError::EmptyAudio(_))
        ));
        assert!(matches!(
            verify_audio(dir.path().join("missing.mp3")).await,
            Err(FetchError::EmptyAudio(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_fails_when_yt_dlp_fails() {
        let Ok(false_bin) = find_binary("false") else {
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        let fetcher = YtDlpWrapper::new(YtDlp::with_binary(false_bin), dir.path());

        let result = fetcher.fetch("https://unreachable.invalid/watch?v=x").await;
        assert!(matches!(result, Err(FetchError::YtDlp(_))), "{result:?}");
    }

    #[tokio::test]
    async fn test_fetch_fails_when_reported_file_is_missing() {
        // `echo` exits successfully and prints its arguments, which is not a real file
        let Ok(echo_bin) = find_binary("echo") else {
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        let fetcher = YtDlpWrapper::new(YtDlp::with_binary(echo_bin), dir.path().join("audio"));

        let result = fetcher.fetch("https://youtube.com/watch?v=x").await;
        assert!(matches!(result, Err(FetchError::EmptyAudio(_))), "{result:?}");
        assert!(fetcher.audio_dl_path().exists());
    }

    #[test]
    fn test_output_template_is_unique_per_download() {
        let fetcher = YtDlpWrapper::new(YtDlp::with_binary("yt-dlp"), "/var/tmp/quiz-pulse/audio");

        let first = fetcher.output_template();
        let second = fetcher.output_template();

        assert_ne!(first, second);
        for template in [&first, &second] {
            assert!(template.starts_with("/var/tmp/quiz-pulse/audio"));
            let name = template.file_name().unwrap().to_string_lossy();
            assert!(name.starts_with("%(title)s-%(id)s-"), "{name}");
            assert!(name.ends_with(".%(ext)s"), "{name}");
        }
    }

    fn find_binary(name: &str) -> Result<PathBuf, ()> {
        ["/bin", "/usr/bin"]
            .iter()
            .map(|dir| Path::new(dir).join(name))
            .find(|p| p.exists())
            .ok_or(())
    }
}
