pub mod assemblyai;
pub mod gemini;
pub mod quiz;
pub mod transcriber;
