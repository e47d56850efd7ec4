//! Per-event-type analytics counters

use chrono::Utc;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ExprTrait, QueryFilter,
    TransactionTrait, sea_query::Expr, sea_query::OnConflict,
};

use super::SeaOrmStorage;
use super::retry;
use crate::errors::{AskmeError, Result};
use crate::storage::AnalyticsEventType;

use migration::entities::analytics_event;

impl SeaOrmStorage {
    /// Atomically create-or-increment the counter and return the new total.
    pub async fn increment_event(&self, event_type: AnalyticsEventType) -> Result<i64> {
        let db = &self.db;

        retry::with_retry(&format!("increment_event({})", event_type), self.retry_config, || {
            increment_txn(db, event_type.as_ref())
        })
        .await
        .map_err(|e| AskmeError::database_operation(format!("Failed to record event: {}", e)))
    }

    /// Raw counter rows as `(event_type, total)`.
    pub async fn event_totals(&self) -> Result<Vec<(String, i64)>> {
        let db = &self.db;

        let models = retry::with_retry("event_totals", self.retry_config, || async move {
            analytics_event::Entity::find().all(db).await
        })
        .await
        .map_err(|e| AskmeError::database_operation(format!("Failed to load event totals: {}", e)))?;

        Ok(models
            .into_iter()
            .map(|m| (m.event_type, Ord::max(m.total, 0)))
            .collect())
    }
}

async fn increment_txn(db: &DatabaseConnection, event_type: &str) -> std::result::Result<i64, DbErr> {
    let txn = db.begin().await?;
    let now = Utc::now();

    let row = analytics_event::ActiveModel {
        event_type: Set(event_type.to_string()),
        total: Set(0),
        updated_at: Set(now),
    };
    analytics_event::Entity::insert(row)
        .on_conflict(
            OnConflict::column(analytics_event::Column::EventType)
                .update_column(analytics_event::Column::UpdatedAt)
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await?;

    analytics_event::Entity::update_many()
        .col_expr(
            analytics_event::Column::Total,
            Expr::col(analytics_event::Column::Total).add(1i64),
        )
        .filter(analytics_event::Column::EventType.eq(event_type))
        .exec(&txn)
        .await?;

    let total = analytics_event::Entity::find_by_id(event_type.to_string())
        .one(&txn)
        .await?
        .map(|m| m.total)
        .ok_or_else(|| DbErr::RecordNotFound(format!("counter '{}' vanished after upsert", event_type)))?;

    txn.commit().await?;
    Ok(total)
}
