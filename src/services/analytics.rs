use std::collections::BTreeMap;
use std::sync::Arc;

use strum::IntoEnumIterator;
use tracing::debug;

use crate::errors::Result;
use crate::storage::{AnalyticsCounter, AnalyticsEventType, MetricsSummary, SeaOrmStorage};

#[derive(Clone)]
pub struct AnalyticsService {
    storage: Arc<SeaOrmStorage>,
}

impl AnalyticsService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn track(&self, event_type: AnalyticsEventType) -> Result<AnalyticsCounter> {
        let total = self.storage.increment_event(event_type).await?;
        debug!("Analytics event {} now at {}", event_type, total);
        Ok(AnalyticsCounter { event_type, total })
    }

    /// Totals for every known event type, zero when never tracked.
    pub async fn totals(&self) -> Result<Vec<AnalyticsCounter>> {
        let stored: BTreeMap<String, i64> = self.storage.event_totals().await?.into_iter().collect();
        Ok(AnalyticsEventType::iter()
            .map(|event_type| AnalyticsCounter {
                event_type,
                total: stored.get(event_type.as_ref()).copied().unwrap_or(0),
            })
            .collect())
    }
}

/// Dashboard rollup
#[derive(Clone)]
pub struct MetricsService {
    storage: Arc<SeaOrmStorage>,
    top_n: u64,
}

impl MetricsService {
    pub fn new(storage: Arc<SeaOrmStorage>, top_n: u64) -> Self {
        Self {
            storage,
            top_n: top_n.max(1),
        }
    }

    pub async fn summary(&self) -> Result<MetricsSummary> {
        self.storage.metrics_summary(self.top_n).await
    }
}
