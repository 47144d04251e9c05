use std::sync::{Arc, Mutex};

use quiz_pulse::{GenerationError, QuizGenerator};

pub const FIVE_QUESTION_QUIZ: &str = "\
1. What is said first?\nA) hello B) bye C) hi D) hey\nAnswer: A
2. What is said second?\nA) moon B) world C) sun D) sky\nAnswer: B
3. How many words are spoken?\nA) 1 B) 2 C) 3 D) 4\nAnswer: B
4. Is it a greeting?\nA) yes B) no C) maybe D) unknown\nAnswer: A
5. Which language?\nA) French B) German C) English D) Swahili\nAnswer: C";

#[derive(Clone)]
pub struct MockQuizGenerator {
    pub quiz: String,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl MockQuizGenerator {
    pub fn new(quiz: &str) -> Self {
        Self {
            quiz: quiz.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            quiz: String::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(msg.to_string()),
        }
    }
}

impl QuizGenerator for MockQuizGenerator {
    const GENERATION_MODEL: &'static str = "mock-gemini";

    async fn generate(&self, transcript: &str) -> Result<String, GenerationError> {
        self.calls.lock().unwrap().push(transcript.to_string());
        if let Some(ref msg) = self.fail_with {
            return Err(GenerationError::Api {
                status: 429,
                message: msg.clone(),
            });
        }
        Ok(self.quiz.clone())
    }
}
