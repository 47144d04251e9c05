pub mod audio_handler;

use std::{future::Future, path::PathBuf};

use crate::error::FetchError;

/// Resolves a source URL to a local, transcoded audio file
pub trait MediaFetcher {
    const AUDIO_FORMAT: &'static str;

    fn fetch(&self, url: &str) -> impl Future<Output = Result<PathBuf, FetchError>> + Send;
}
