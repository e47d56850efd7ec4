use std::str::FromStr;

use crate::errors::{AskmeError, Result};
use crate::storage::{AdminCredential, Question, Suggestion, SuggestionStatus};
use migration::entities::{admin_credential, question, suggestion};

/// Entity row to `Question`
pub fn model_to_question(model: question::Model) -> Question {
    Question {
        id: model.id,
        text: model.text,
        category: model.category,
        click_count: model.click_count.max(0),
        is_active: model.is_active,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

/// Entity row to `Suggestion`
///
/// The status column is free text at the schema level; an unknown value is
/// reported as a data error instead of being coerced.
pub fn model_to_suggestion(model: suggestion::Model) -> Result<Suggestion> {
    let status = SuggestionStatus::from_str(&model.status).map_err(|_| {
        AskmeError::database_operation(format!(
            "Suggestion {} has unknown status '{}'",
            model.id, model.status
        ))
    })?;

    Ok(Suggestion {
        id: model.id,
        text: model.text,
        category: model.category,
        status,
        created_at: model.created_at,
        updated_at: model.updated_at,
        processed_at: model.processed_at,
        question_id: model.question_id,
    })
}

pub fn model_to_admin_credential(model: admin_credential::Model) -> AdminCredential {
    AdminCredential {
        id: model.id,
        email: model.email,
        password_hash: model.password_hash,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
