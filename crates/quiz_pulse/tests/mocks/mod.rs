pub mod media_fetcher;
pub mod quiz_generator;
pub mod transcriber;
