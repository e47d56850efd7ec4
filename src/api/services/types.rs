//! Request bodies and query strings

use serde::Deserialize;
use ts_rs::TS;

pub const TS_EXPORT_PATH: &str = "../frontend/src/api/types.generated.ts";

#[derive(Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct TrackQuestionRequest {
    pub text: String,
    #[ts(optional)]
    pub category: Option<String>,
}

#[derive(Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct CreateSuggestionRequest {
    pub text: String,
    #[ts(optional)]
    pub category: Option<String>,
}

#[derive(Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct AnalyticsEventRequest {
    #[serde(rename = "type")]
    pub event_type: String,
}

#[derive(Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize, Clone, Debug, Default, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ApproveRequest {
    #[ts(optional)]
    pub category: Option<String>,
}

#[derive(Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct SetActiveRequest {
    pub is_active: bool,
}

#[derive(serde::Serialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    #[ts(type = "number")]
    pub expires_in: i64,
}

/// Query values are kept as strings so that junk is handled by validation
/// rather than rejected by the extractor.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct TopQuery {
    pub limit: Option<String>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct StatusQuery {
    pub status: Option<String>,
}
