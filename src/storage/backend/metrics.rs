//! Read-only dashboard rollup

use std::collections::BTreeMap;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QuerySelect};
use strum::IntoEnumIterator;

use super::SeaOrmStorage;
use super::retry;
use crate::errors::{AskmeError, Result};
use crate::storage::{AnalyticsEventType, MetricsSummary, SuggestionStatus, TopQuestion};

use migration::entities::{question, suggestion};

impl SeaOrmStorage {
    /// Clicks of active questions, summed per category in Rust so the result
    /// type does not depend on the backend's SUM() return type.
    async fn active_click_rows(&self) -> Result<Vec<(String, i64)>> {
        let db = &self.db;

        retry::with_retry("active_click_rows", self.retry_config, || async move {
            question::Entity::find()
                .select_only()
                .column(question::Column::Category)
                .column(question::Column::ClickCount)
                .filter(question::Column::IsActive.eq(true))
                .into_tuple::<(String, i64)>()
                .all(db)
                .await
        })
        .await
        .map_err(|e| AskmeError::database_operation(format!("Failed to load click counts: {}", e)))
    }

    /// Suggestion count per status; statuses without rows are absent.
    pub async fn suggestion_counts(&self) -> Result<Vec<(String, i64)>> {
        let db = &self.db;

        retry::with_retry("suggestion_counts", self.retry_config, || async move {
            suggestion::Entity::find()
                .select_only()
                .column(suggestion::Column::Status)
                .column_as(suggestion::Column::Id.count(), "count")
                .group_by(suggestion::Column::Status)
                .into_tuple::<(String, i64)>()
                .all(db)
                .await
        })
        .await
        .map_err(|e| AskmeError::database_operation(format!("Failed to count suggestions: {}", e)))
    }

    pub async fn metrics_summary(&self, top_n: u64) -> Result<MetricsSummary> {
        let click_rows = self.active_click_rows().await?;
        let mut clicks_by_category: BTreeMap<String, i64> = BTreeMap::new();
        let mut total_clicks = 0i64;
        for (category, clicks) in &click_rows {
            let clicks = (*clicks).max(0);
            total_clicks = total_clicks.saturating_add(clicks);
            *clicks_by_category.entry(category.clone()).or_insert(0) += clicks;
        }

        let mut status_counts: BTreeMap<String, u64> = BTreeMap::new();
        for (status, count) in self.suggestion_counts().await? {
            status_counts.insert(status, count.max(0) as u64);
        }
        let count_of = |status: SuggestionStatus| -> u64 {
            status_counts.get(status.as_ref()).copied().unwrap_or(0)
        };

        let mut event_totals: BTreeMap<String, i64> = AnalyticsEventType::iter()
            .map(|t| (t.to_string(), 0))
            .collect();
        for (event_type, total) in self.event_totals().await? {
            event_totals.insert(event_type, total);
        }
        let cv_downloads = event_totals
            .get(AnalyticsEventType::CvDownload.as_ref())
            .copied()
            .unwrap_or(0);
        let github_visits = event_totals
            .get(AnalyticsEventType::GithubVisit.as_ref())
            .copied()
            .unwrap_or(0);

        let top_questions = self
            .top_questions(top_n)
            .await?
            .into_iter()
            .map(TopQuestion::from)
            .collect();

        Ok(MetricsSummary {
            total_clicks,
            clicks_by_category,
            active_questions: click_rows.len() as u64,
            pending_suggestions: count_of(SuggestionStatus::Pending),
            approved_suggestions: count_of(SuggestionStatus::Approved),
            rejected_suggestions: count_of(SuggestionStatus::Rejected),
            cv_downloads,
            github_visits,
            event_totals,
            top_questions,
        })
    }
}
