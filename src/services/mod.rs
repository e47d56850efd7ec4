//! Business logic shared by the HTTP handlers
//!
//! Services validate input, call into [`SeaOrmStorage`](crate::storage::SeaOrmStorage)
//! and return domain types. They are constructed once at startup and handed
//! to actix as `web::Data`.

pub mod analytics;
pub mod auth;
pub mod questions;
pub mod suggestions;
pub mod validation;

pub use analytics::{AnalyticsService, MetricsService};
pub use auth::{AuthService, LoginResult};
pub use questions::QuestionService;
pub use suggestions::SuggestionService;
