//! Question catalog operations for SeaOrmStorage

use chrono::Utc;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ExprTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, TransactionTrait, sea_query::Expr, sea_query::OnConflict,
};
use tracing::{debug, info};

use super::SeaOrmStorage;
use super::converters::model_to_question;
use super::retry;
use crate::errors::{AskmeError, Result};
use crate::storage::Question;

use migration::entities::question;

/// Newest activity first.
fn recent_first(select: Select<question::Entity>) -> Select<question::Entity> {
    select
        .order_by_desc(question::Column::UpdatedAt)
        .order_by_desc(question::Column::CreatedAt)
        .order_by_desc(question::Column::Id)
}

impl SeaOrmStorage {
    pub async fn list_questions(&self, active_only: bool) -> Result<Vec<Question>> {
        let db = &self.db;

        let models = retry::with_retry("list_questions", self.retry_config, || async move {
            let mut select = question::Entity::find();
            if active_only {
                select = select.filter(question::Column::IsActive.eq(true));
            }
            recent_first(select).all(db).await
        })
        .await
        .map_err(|e| AskmeError::database_operation(format!("Failed to list questions: {}", e)))?;

        Ok(models.into_iter().map(model_to_question).collect())
    }

    /// Active questions ordered by click count, ties broken by recency.
    pub async fn top_questions(&self, limit: u64) -> Result<Vec<Question>> {
        let db = &self.db;

        let models = retry::with_retry("top_questions", self.retry_config, || async move {
            question::Entity::find()
                .filter(question::Column::IsActive.eq(true))
                .order_by_desc(question::Column::ClickCount)
                .order_by_desc(question::Column::UpdatedAt)
                .order_by_desc(question::Column::CreatedAt)
                .order_by_desc(question::Column::Id)
                .limit(limit)
                .all(db)
                .await
        })
        .await
        .map_err(|e| AskmeError::database_operation(format!("Failed to load top questions: {}", e)))?;

        Ok(models.into_iter().map(model_to_question).collect())
    }

    /// Increment the click counter of an active question.
    pub async fn increment_question_click(&self, id: i32) -> Result<Question> {
        let db = &self.db;

        let model = retry::with_retry(&format!("click({})", id), self.retry_config, || {
            click_txn(db, id)
        })
        .await
        .map_err(|e| AskmeError::database_operation(format!("Failed to record click: {}", e)))?;

        model
            .map(model_to_question)
            .ok_or_else(|| AskmeError::not_found("Question not found or inactive"))
    }

    /// Insert-or-reactivate a question by text and count one use of it.
    pub async fn track_question_usage(&self, text: &str, category: &str) -> Result<Question> {
        let db = &self.db;

        let model = retry::with_retry("track_question_usage", self.retry_config, || {
            track_usage_txn(db, text, category)
        })
        .await
        .map_err(|e| AskmeError::database_operation(format!("Failed to track question usage: {}", e)))?;

        debug!("Tracked usage of question {}", model.id);
        Ok(model_to_question(model))
    }

    pub async fn set_question_active(&self, id: i32, is_active: bool) -> Result<Question> {
        let db = &self.db;

        let model = retry::with_retry(&format!("set_question_active({})", id), self.retry_config, || async move {
            let result = question::Entity::update_many()
                .col_expr(question::Column::IsActive, Expr::value(is_active))
                .col_expr(question::Column::UpdatedAt, Expr::value(Utc::now()))
                .filter(question::Column::Id.eq(id))
                .exec(db)
                .await?;

            if result.rows_affected == 0 {
                return Ok(None);
            }
            question::Entity::find_by_id(id).one(db).await
        })
        .await
        .map_err(|e| AskmeError::database_operation(format!("Failed to update question: {}", e)))?;

        let question = model
            .map(model_to_question)
            .ok_or_else(|| AskmeError::not_found("Question not found"))?;
        info!("Question {} is_active set to {}", id, is_active);
        Ok(question)
    }
}

/// Increment and read back in one transaction, so a retry after a failed
/// read cannot count the click twice.
async fn click_txn(
    db: &DatabaseConnection,
    id: i32,
) -> std::result::Result<Option<question::Model>, DbErr> {
    let txn = db.begin().await?;

    let result = question::Entity::update_many()
        .col_expr(
            question::Column::ClickCount,
            Expr::col(question::Column::ClickCount).add(1i64),
        )
        .col_expr(question::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(question::Column::Id.eq(id))
        .filter(question::Column::IsActive.eq(true))
        .exec(&txn)
        .await?;

    if result.rows_affected == 0 {
        txn.rollback().await?;
        return Ok(None);
    }

    let model = question::Entity::find_by_id(id).one(&txn).await?;
    txn.commit().await?;
    Ok(model)
}

async fn track_usage_txn(
    db: &DatabaseConnection,
    text: &str,
    category: &str,
) -> std::result::Result<question::Model, DbErr> {
    let txn = db.begin().await?;
    let now = Utc::now();

    let row = question::ActiveModel {
        text: Set(text.to_string()),
        category: Set(category.to_string()),
        click_count: Set(0),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    question::Entity::insert(row)
        .on_conflict(
            OnConflict::column(question::Column::Text)
                .update_columns([
                    question::Column::Category,
                    question::Column::IsActive,
                    question::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await?;

    question::Entity::update_many()
        .col_expr(
            question::Column::ClickCount,
            Expr::col(question::Column::ClickCount).add(1i64),
        )
        .filter(question::Column::Text.eq(text))
        .exec(&txn)
        .await?;

    let model = question::Entity::find()
        .filter(question::Column::Text.eq(text))
        .one(&txn)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("question '{}' vanished after upsert", text)))?;

    txn.commit().await?;
    Ok(model)
}
