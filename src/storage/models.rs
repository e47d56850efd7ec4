use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use ts_rs::TS;

/// Catalog entry shown on the public site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/api/types.generated.ts")]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i32,
    pub text: String,
    pub category: String,
    #[ts(type = "number")]
    pub click_count: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Suggestion lifecycle. `Approved` and `Rejected` are terminal.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    TS,
    EnumString,
    AsRefStr,
    Display,
    EnumIter,
)]
#[ts(export, export_to = "../frontend/src/api/types.generated.ts")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SuggestionStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/api/types.generated.ts")]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: i32,
    pub text: String,
    pub category: Option<String>,
    pub status: SuggestionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    /// Set only once the suggestion is approved
    pub question_id: Option<i32>,
}

/// Result of a successful approval
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/api/types.generated.ts")]
pub struct ApprovalOutcome {
    pub suggestion: Suggestion,
    pub question: Question,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    TS,
    EnumString,
    AsRefStr,
    Display,
    EnumIter,
)]
#[ts(export, export_to = "../frontend/src/api/types.generated.ts")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AnalyticsEventType {
    CvDownload,
    GithubVisit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/api/types.generated.ts")]
pub struct AnalyticsCounter {
    #[serde(rename = "type")]
    pub event_type: AnalyticsEventType,
    #[ts(type = "number")]
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/api/types.generated.ts")]
#[serde(rename_all = "camelCase")]
pub struct TopQuestion {
    pub id: i32,
    pub text: String,
    pub category: String,
    #[ts(type = "number")]
    pub click_count: i64,
}

impl From<Question> for TopQuestion {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            text: q.text,
            category: q.category,
            click_count: q.click_count,
        }
    }
}

/// Dashboard rollup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/api/types.generated.ts")]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    #[ts(type = "number")]
    pub total_clicks: i64,
    #[ts(type = "Record<string, number>")]
    pub clicks_by_category: BTreeMap<String, i64>,
    #[ts(type = "number")]
    pub active_questions: u64,
    #[ts(type = "number")]
    pub pending_suggestions: u64,
    #[ts(type = "number")]
    pub approved_suggestions: u64,
    #[ts(type = "number")]
    pub rejected_suggestions: u64,
    #[ts(type = "number")]
    pub cv_downloads: i64,
    #[ts(type = "number")]
    pub github_visits: i64,
    #[ts(type = "Record<string, number>")]
    pub event_totals: BTreeMap<String, i64>,
    pub top_questions: Vec<TopQuestion>,
}

/// Stored admin identity. Never serialized to clients.
#[derive(Debug, Clone)]
pub struct AdminCredential {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_status_strings() {
        assert_eq!(SuggestionStatus::Pending.as_ref(), "pending");
        assert_eq!(
            SuggestionStatus::from_str("rejected").unwrap(),
            SuggestionStatus::Rejected
        );
        assert!(SuggestionStatus::from_str("archived").is_err());
    }

    #[test]
    fn test_event_type_strings() {
        assert_eq!(AnalyticsEventType::CvDownload.as_ref(), "cv_download");
        assert_eq!(
            AnalyticsEventType::from_str("github_visit").unwrap(),
            AnalyticsEventType::GithubVisit
        );
    }

    #[test]
    fn test_counter_serializes_type_key() {
        let counter = AnalyticsCounter {
            event_type: AnalyticsEventType::CvDownload,
            total: 3,
        };
        let json = serde_json::to_value(&counter).unwrap();
        assert_eq!(json["type"], "cv_download");
        assert_eq!(json["total"], 3);
    }

    #[test]
    fn test_question_wire_names() {
        let now = Utc::now();
        let q = Question {
            id: 1,
            text: "Why Rust?".into(),
            category: "general".into(),
            click_count: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["clickCount"], 0);
        assert_eq!(json["isActive"], true);
        assert!(json.get("createdAt").is_some());
    }
}
