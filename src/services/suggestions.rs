use std::sync::Arc;

use crate::errors::Result;
use crate::storage::{ApprovalOutcome, SeaOrmStorage, Suggestion, SuggestionStatus};

use super::validation;

/// Public submission and admin moderation of suggestions
#[derive(Clone)]
pub struct SuggestionService {
    storage: Arc<SeaOrmStorage>,
}

impl SuggestionService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn submit(&self, text: &str, category: Option<&str>) -> Result<Suggestion> {
        let (text, category) = validation::suggestion_input(text, category)?;
        self.storage
            .insert_suggestion(&text, category.as_deref())
            .await
    }

    pub async fn list(&self, status: Option<SuggestionStatus>) -> Result<Vec<Suggestion>> {
        self.storage.list_suggestions(status).await
    }

    /// Approve a pending suggestion, creating its catalog question.
    ///
    /// Fails with `NotFound` for an unknown id and `Conflict` when the
    /// suggestion is no longer pending or its text is already a question.
    pub async fn approve(&self, id: i32, category: Option<&str>) -> Result<ApprovalOutcome> {
        let category = validation::approve_category(category)?;
        self.storage
            .approve_suggestion(id, category.as_deref())
            .await
    }

    pub async fn reject(&self, id: i32) -> Result<Suggestion> {
        self.storage.reject_suggestion(id).await
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        self.storage.delete_suggestion(id).await
    }
}
