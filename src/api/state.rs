//! Per-process application state shared by all workers

use std::sync::Arc;

use crate::api::jwt::JwtService;
use crate::api::middleware::FixedWindowLimiter;
use crate::api::services::admin::{LoginLimiterConfig, login_limiter_config};
use crate::config::StaticConfig;
use crate::errors::Result;
use crate::services::{
    AnalyticsService, AuthService, MetricsService, QuestionService, SuggestionService,
};
use crate::storage::SeaOrmStorage;

/// Everything the routes need, built once and cloned into each worker.
///
/// The limiters are behind `Arc`s, so every worker sees the same counters.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<SeaOrmStorage>,
    pub questions: QuestionService,
    pub suggestions: SuggestionService,
    pub analytics: AnalyticsService,
    pub metrics: MetricsService,
    pub auth: AuthService,
    pub suggestion_limiter: Arc<FixedWindowLimiter>,
    pub login_limiter: LoginLimiterConfig,
    pub trusted_proxies: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(storage: Arc<SeaOrmStorage>, config: &StaticConfig) -> Result<Self> {
        let jwt = Arc::new(JwtService::from_config(&config.auth));
        let trusted_proxies = Arc::new(config.rate_limit.trusted_proxies.clone());

        Ok(Self {
            questions: QuestionService::new(storage.clone()),
            suggestions: SuggestionService::new(storage.clone()),
            analytics: AnalyticsService::new(storage.clone()),
            metrics: MetricsService::new(storage.clone(), config.metrics.top_questions),
            auth: AuthService::new(storage.clone(), jwt),
            suggestion_limiter: Arc::new(FixedWindowLimiter::from_minutes(
                config.rate_limit.suggestion_max,
                config.rate_limit.suggestion_window_minutes,
            )),
            login_limiter: login_limiter_config(&config.rate_limit, trusted_proxies.clone())?,
            trusted_proxies,
            storage,
        })
    }
}
