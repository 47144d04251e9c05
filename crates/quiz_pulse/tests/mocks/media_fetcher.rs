use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use quiz_pulse::{yt::MediaFetcher, FetchError};

#[derive(Clone)]
pub struct MockMediaFetcher {
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
    pub hang: bool,
}

impl Default for MockMediaFetcher {
    fn default() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
            hang: false,
        }
    }
}

impl MockMediaFetcher {
    pub fn failing(msg: &str) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(msg.to_string()),
            hang: false,
        }
    }

    /// A download that never finishes
    pub fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::default()
        }
    }
}

impl MediaFetcher for MockMediaFetcher {
    const AUDIO_FORMAT: &'static str = "mp3";

    async fn fetch(&self, url: &str) -> Result<PathBuf, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        if self.hang {
            return std::future::pending().await;
        }
        if let Some(ref msg) = self.fail_with {
            return Err(FetchError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                msg.clone(),
            )));
        }
        Ok(PathBuf::from("/tmp/mock/lecture.mp3"))
    }
}
