use std::sync::Arc;

use crate::errors::Result;
use crate::storage::{Question, SeaOrmStorage};

use super::validation;

#[derive(Clone)]
pub struct QuestionService {
    storage: Arc<SeaOrmStorage>,
}

impl QuestionService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// Public catalog: active questions, most recently touched first.
    pub async fn list_active(&self) -> Result<Vec<Question>> {
        self.storage.list_questions(true).await
    }

    pub async fn list_all(&self) -> Result<Vec<Question>> {
        self.storage.list_questions(false).await
    }

    /// `limit` is clamped to 1..=50.
    pub async fn top(&self, limit: u64) -> Result<Vec<Question>> {
        let limit = limit.clamp(1, validation::TOP_LIMIT_MAX);
        self.storage.top_questions(limit).await
    }

    pub async fn record_click(&self, id: i32) -> Result<Question> {
        self.storage.increment_question_click(id).await
    }

    /// Upsert by text and count one use.
    pub async fn track_usage(&self, text: &str, category: Option<&str>) -> Result<Question> {
        let (text, category) = validation::usage_input(text, category)?;
        self.storage.track_question_usage(&text, &category).await
    }

    pub async fn set_active(&self, id: i32, is_active: bool) -> Result<Question> {
        self.storage.set_question_active(id, is_active).await
    }
}
