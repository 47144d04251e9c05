use std::future::Future;

use crate::error::GenerationError;

/// Turns transcript text into quiz text using a generative-text model.
///
/// The model output is returned as-is; no question structure is enforced.
pub trait QuizGenerator: Send + Sync {
    const GENERATION_MODEL: &'static str;

    fn generate(
        &self,
        transcript: &str,
    ) -> impl Future<Output = Result<String, GenerationError>> + Send;
}
