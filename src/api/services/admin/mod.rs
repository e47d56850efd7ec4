//! Admin API
//!
//! - login (rate limited)
//! - question management
//! - suggestion moderation

pub mod auth;
mod questions;
pub mod routes;
mod suggestions;

pub use auth::{LoginKeyExtractor, LoginLimiterConfig, login, login_limiter_config};
pub use questions::{list_all_questions, set_question_active, top_questions};
pub use suggestions::{approve_suggestion, delete_suggestion, list_suggestions, reject_suggestion};
