//! Input validation shared by the HTTP handlers and services
//!
//! Every function returns already-trimmed values or a `Validation` error
//! carrying the message shown to the client.

use std::str::FromStr;

use crate::errors::{AskmeError, Result};
use crate::storage::{AnalyticsEventType, SuggestionStatus};

pub const SUGGESTION_TEXT_MAX: usize = 220;
pub const QUESTION_TEXT_MAX: usize = 255;
pub const CATEGORY_MAX: usize = 60;

pub const TOP_LIMIT_DEFAULT: u64 = 5;
pub const TOP_LIMIT_MAX: u64 = 50;

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Trimmed, optional category: blank means "not given".
pub fn optional_category(category: Option<&str>) -> Result<Option<String>> {
    let Some(category) = category.map(str::trim).filter(|c| !c.is_empty()) else {
        return Ok(None);
    };
    if char_len(category) > CATEGORY_MAX {
        return Err(AskmeError::validation(format!(
            "Category must be at most {} characters",
            CATEGORY_MAX
        )));
    }
    Ok(Some(category.to_string()))
}

pub fn suggestion_input(text: &str, category: Option<&str>) -> Result<(String, Option<String>)> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AskmeError::validation("Suggestion text must not be empty"));
    }
    if char_len(text) > SUGGESTION_TEXT_MAX {
        return Err(AskmeError::validation(format!(
            "Suggestion must be at most {} characters",
            SUGGESTION_TEXT_MAX
        )));
    }
    Ok((text.to_string(), optional_category(category)?))
}

/// Question text plus its category, defaulted to `general`.
pub fn usage_input(text: &str, category: Option<&str>) -> Result<(String, String)> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AskmeError::validation("Question text must not be empty"));
    }
    if char_len(text) > QUESTION_TEXT_MAX {
        return Err(AskmeError::validation(format!(
            "Question text must be at most {} characters",
            QUESTION_TEXT_MAX
        )));
    }
    let category = optional_category(category)?
        .unwrap_or_else(|| crate::storage::backend::DEFAULT_CATEGORY.to_string());
    Ok((text.to_string(), category))
}

/// An approval override, when present, must not be blank.
pub fn approve_category(category: Option<&str>) -> Result<Option<String>> {
    match category {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Err(AskmeError::validation("Category is required")),
        Some(raw) => optional_category(Some(raw)),
    }
}

/// Returns the trimmed email.
pub fn login_input<'a>(email: &'a str, password: &str) -> Result<&'a str> {
    let email = email.trim();
    if !looks_like_email(email) {
        return Err(AskmeError::validation("Invalid email"));
    }
    if password.is_empty() {
        return Err(AskmeError::validation("Password is required"));
    }
    Ok(email)
}

fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}

/// Parse a positive integer path id; `what` names the entity in the error.
pub fn parse_id(raw: &str, what: &str) -> Result<i32> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AskmeError::validation(format!("Invalid {} id", what)))
}

pub fn status_filter(raw: Option<&str>) -> Result<Option<SuggestionStatus>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => SuggestionStatus::from_str(s)
            .map(Some)
            .map_err(|_| AskmeError::validation(format!("Invalid status filter: {}", s))),
    }
}

pub fn event_type(raw: &str) -> Result<AnalyticsEventType> {
    AnalyticsEventType::from_str(raw.trim())
        .map_err(|_| AskmeError::validation(format!("Unknown analytics event type: {}", raw)))
}

/// `limit` query value: default 5, clamped to 1..=50, junk falls back to 5.
pub fn top_limit(raw: Option<&str>) -> u64 {
    match raw.map(str::trim).and_then(|s| s.parse::<i64>().ok()) {
        Some(n) => n.clamp(1, TOP_LIMIT_MAX as i64) as u64,
        None => TOP_LIMIT_DEFAULT,
    }
}
