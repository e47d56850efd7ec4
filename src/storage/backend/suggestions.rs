//! Suggestion storage and the moderation workflow
//!
//! Every state change is guarded by `status = 'pending'` in its WHERE clause,
//! so a suggestion leaves `pending` at most once even under concurrent admins.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, DbBackend, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    SqlErr, TransactionTrait, sea_query::Expr,
};
use tracing::info;

use super::SeaOrmStorage;
use super::converters::{model_to_question, model_to_suggestion};
use super::retry;
use crate::errors::{AskmeError, Result};
use crate::storage::{ApprovalOutcome, Suggestion, SuggestionStatus};

use migration::entities::{question, suggestion};

/// Category used when neither the admin nor the submitter picked one.
pub const DEFAULT_CATEGORY: &str = "general";

/// Logical outcome of a transaction body; the outer `DbErr` is reserved
/// for failures the retry loop may act on.
type TxnResult<T> = std::result::Result<Result<T>, DbErr>;

fn not_pending(action: &str) -> AskmeError {
    AskmeError::conflict(format!("Only pending suggestions can be {}", action))
}

fn suggestion_not_found() -> AskmeError {
    AskmeError::not_found("Suggestion not found")
}

/// override > suggestion's own > default; blank values fall through.
pub fn resolve_category(override_category: Option<&str>, own: Option<&str>) -> String {
    override_category
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .or_else(|| own.map(str::trim).filter(|c| !c.is_empty()))
        .unwrap_or(DEFAULT_CATEGORY)
        .to_string()
}

impl SeaOrmStorage {
    pub async fn insert_suggestion(&self, text: &str, category: Option<&str>) -> Result<Suggestion> {
        let now = Utc::now();
        let row = suggestion::ActiveModel {
            text: Set(text.to_string()),
            category: Set(category.map(str::to_string)),
            status: Set(SuggestionStatus::Pending.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            processed_at: Set(None),
            question_id: Set(None),
            ..Default::default()
        };

        // not retried: a lost response after commit would duplicate the row
        let model = row
            .insert(&self.db)
            .await
            .map_err(|e| AskmeError::database_operation(format!("Failed to save suggestion: {}", e)))?;

        info!("Suggestion {} submitted", model.id);
        model_to_suggestion(model)
    }

    /// All suggestions, newest first, optionally filtered by status.
    pub async fn list_suggestions(&self, status: Option<SuggestionStatus>) -> Result<Vec<Suggestion>> {
        let db = &self.db;

        let models = retry::with_retry("list_suggestions", self.retry_config, || async move {
            let mut select = suggestion::Entity::find();
            if let Some(status) = status {
                select = select.filter(suggestion::Column::Status.eq(status.as_ref()));
            }
            select
                .order_by_desc(suggestion::Column::CreatedAt)
                .order_by_desc(suggestion::Column::Id)
                .all(db)
                .await
        })
        .await
        .map_err(|e| AskmeError::database_operation(format!("Failed to list suggestions: {}", e)))?;

        models.into_iter().map(model_to_suggestion).collect()
    }

    pub async fn get_suggestion(&self, id: i32) -> Result<Option<Suggestion>> {
        let db = &self.db;

        let model = retry::with_retry(&format!("get_suggestion({})", id), self.retry_config, || async move {
            suggestion::Entity::find_by_id(id).one(db).await
        })
        .await
        .map_err(|e| AskmeError::database_operation(format!("Failed to load suggestion: {}", e)))?;

        model.map(model_to_suggestion).transpose()
    }

    /// Turn a pending suggestion into a catalog question in one transaction.
    pub async fn approve_suggestion(
        &self,
        id: i32,
        override_category: Option<&str>,
    ) -> Result<ApprovalOutcome> {
        let db = &self.db;

        let outcome = retry::with_retry(&format!("approve({})", id), self.retry_config, || {
            approve_txn(db, id, override_category)
        })
        .await
        .map_err(|e| AskmeError::database_operation(format!("Failed to approve suggestion: {}", e)))??;

        info!(
            "Suggestion {} approved as question {} ({})",
            id, outcome.question.id, outcome.question.category
        );
        Ok(outcome)
    }

    pub async fn reject_suggestion(&self, id: i32) -> Result<Suggestion> {
        let db = &self.db;

        let suggestion = retry::with_retry(&format!("reject({})", id), self.retry_config, || {
            reject_txn(db, id)
        })
        .await
        .map_err(|e| AskmeError::database_operation(format!("Failed to reject suggestion: {}", e)))??;

        info!("Suggestion {} rejected", id);
        Ok(suggestion)
    }

    /// Delete a suggestion that is still pending.
    pub async fn delete_suggestion(&self, id: i32) -> Result<()> {
        let db = &self.db;

        retry::with_retry(&format!("delete_suggestion({})", id), self.retry_config, || {
            delete_txn(db, id)
        })
        .await
        .map_err(|e| AskmeError::database_operation(format!("Failed to delete suggestion: {}", e)))??;

        info!("Suggestion {} deleted", id);
        Ok(())
    }
}

/// Read the suggestion inside `txn`, taking a row lock where the backend
/// supports `SELECT ... FOR UPDATE`.
async fn lock_suggestion(
    txn: &DatabaseTransaction,
    id: i32,
) -> std::result::Result<Option<suggestion::Model>, DbErr> {
    let mut select = suggestion::Entity::find_by_id(id);
    if txn.get_database_backend() != DbBackend::Sqlite {
        select = select.lock_exclusive();
    }
    select.one(txn).await
}

/// Guarded transition out of `pending`. Returns the number of rows changed.
async fn finish_pending(
    txn: &DatabaseTransaction,
    id: i32,
    status: SuggestionStatus,
    category: Option<&str>,
    question_id: Option<i32>,
) -> std::result::Result<u64, DbErr> {
    let now = Utc::now();
    let mut update = suggestion::Entity::update_many()
        .col_expr(suggestion::Column::Status, Expr::value(status.as_ref()))
        .col_expr(suggestion::Column::ProcessedAt, Expr::value(now))
        .col_expr(suggestion::Column::UpdatedAt, Expr::value(now));
    if let Some(category) = category {
        update = update.col_expr(suggestion::Column::Category, Expr::value(category));
    }
    if let Some(question_id) = question_id {
        update = update.col_expr(suggestion::Column::QuestionId, Expr::value(question_id));
    }

    let result = update
        .filter(suggestion::Column::Id.eq(id))
        .filter(suggestion::Column::Status.eq(SuggestionStatus::Pending.as_ref()))
        .exec(txn)
        .await?;
    Ok(result.rows_affected)
}

/// Re-read after a guarded write changed nothing to tell a vanished row
/// from one that left `pending` concurrently.
async fn explain_lost_race(
    txn: &DatabaseTransaction,
    id: i32,
    action: &str,
) -> std::result::Result<AskmeError, DbErr> {
    let exists = suggestion::Entity::find_by_id(id).one(txn).await?.is_some();
    Ok(if exists {
        not_pending(action)
    } else {
        suggestion_not_found()
    })
}

/// Load the row and check it is pending, or produce the matching error.
async fn load_pending(
    txn: &DatabaseTransaction,
    id: i32,
    action: &str,
) -> TxnResult<suggestion::Model> {
    let Some(model) = lock_suggestion(txn, id).await? else {
        return Ok(Err(suggestion_not_found()));
    };
    if model.status != SuggestionStatus::Pending.as_ref() {
        return Ok(Err(not_pending(action)));
    }
    Ok(Ok(model))
}

async fn approve_txn(
    db: &DatabaseConnection,
    id: i32,
    override_category: Option<&str>,
) -> TxnResult<ApprovalOutcome> {
    let txn = db.begin().await?;

    let pending = match load_pending(&txn, id, "approved").await? {
        Ok(model) => model,
        Err(e) => {
            txn.rollback().await?;
            return Ok(Err(e));
        }
    };

    let category = resolve_category(override_category, pending.category.as_deref());
    let now = Utc::now();
    let new_question = question::ActiveModel {
        text: Set(pending.text.clone()),
        category: Set(category.clone()),
        click_count: Set(0),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let question = match new_question.insert(&txn).await {
        Ok(model) => model,
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            txn.rollback().await?;
            return Ok(Err(AskmeError::conflict(
                "A question with the same text already exists",
            )));
        }
        Err(e) => return Err(e),
    };

    let changed = finish_pending(
        &txn,
        id,
        SuggestionStatus::Approved,
        Some(&category),
        Some(question.id),
    )
    .await?;
    if changed != 1 {
        let err = explain_lost_race(&txn, id, "approved").await?;
        txn.rollback().await?;
        return Ok(Err(err));
    }

    let updated = suggestion::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("suggestion {} vanished during approval", id)))?;

    txn.commit().await?;

    Ok(model_to_suggestion(updated).map(|suggestion| ApprovalOutcome {
        suggestion,
        question: model_to_question(question),
    }))
}

async fn reject_txn(db: &DatabaseConnection, id: i32) -> TxnResult<Suggestion> {
    let txn = db.begin().await?;

    if let Err(e) = load_pending(&txn, id, "rejected").await? {
        txn.rollback().await?;
        return Ok(Err(e));
    }

    let changed = finish_pending(&txn, id, SuggestionStatus::Rejected, None, None).await?;
    if changed != 1 {
        let err = explain_lost_race(&txn, id, "rejected").await?;
        txn.rollback().await?;
        return Ok(Err(err));
    }

    let updated = suggestion::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("suggestion {} vanished during rejection", id)))?;

    txn.commit().await?;
    Ok(model_to_suggestion(updated))
}

async fn delete_txn(db: &DatabaseConnection, id: i32) -> TxnResult<()> {
    let txn = db.begin().await?;

    if let Err(e) = load_pending(&txn, id, "deleted").await? {
        txn.rollback().await?;
        return Ok(Err(e));
    }

    let result = suggestion::Entity::delete_many()
        .filter(suggestion::Column::Id.eq(id))
        .filter(suggestion::Column::Status.eq(SuggestionStatus::Pending.as_ref()))
        .exec(&txn)
        .await?;

    if result.rows_affected == 0 {
        let err = explain_lost_race(&txn, id, "deleted").await?;
        txn.rollback().await?;
        return Ok(Err(err));
    }

    txn.commit().await?;
    Ok(Ok(()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_category_precedence() {
        assert_eq!(resolve_category(Some("fun"), Some("tech")), "fun");
        assert_eq!(resolve_category(None, Some("tech")), "tech");
        assert_eq!(resolve_category(None, None), DEFAULT_CATEGORY);
    }

    #[test]
    fn test_resolve_category_blank_falls_through() {
        assert_eq!(resolve_category(Some("   "), Some(" tech ")), "tech");
        assert_eq!(resolve_category(Some(""), Some("")), DEFAULT_CATEGORY);
        assert_eq!(resolve_category(Some("  fun "), None), "fun");
    }

    #[test]
    fn test_conflict_messages() {
        assert_eq!(
            not_pending("approved").message(),
            "Only pending suggestions can be approved"
        );
        assert_eq!(suggestion_not_found().message(), "Suggestion not found");
    }
}
