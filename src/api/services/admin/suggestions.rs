use actix_web::{HttpResponse, Result as ActixResult, web};
use tracing::info;

use crate::api::middleware::AdminIdentity;
use crate::errors::AskmeError;
use crate::services::SuggestionService;
use crate::services::validation;

use super::super::response::{no_content, ok};
use super::super::types::{ApproveRequest, StatusQuery};

pub async fn list_suggestions(
    suggestions: web::Data<SuggestionService>,
    query: web::Query<StatusQuery>,
) -> ActixResult<HttpResponse> {
    let status = validation::status_filter(query.status.as_deref())?;
    Ok(ok(suggestions.list(status).await?))
}

/// The approve body is optional: no body, `{}` and `{"category": "x"}` are all valid.
fn parse_approve_body(body: &[u8]) -> Result<ApproveRequest, AskmeError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ApproveRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AskmeError::validation(format!("Invalid JSON body: {}", e)))
}

pub async fn approve_suggestion(
    suggestions: web::Data<SuggestionService>,
    admin: web::ReqData<AdminIdentity>,
    path: web::Path<String>,
    body: web::Bytes,
) -> ActixResult<HttpResponse> {
    let id = validation::parse_id(&path, "suggestion")?;
    let request = parse_approve_body(&body)?;
    let outcome = suggestions
        .approve(id, request.category.as_deref())
        .await?;
    info!(
        "Suggestion #{} approved as question #{} by {}",
        id, outcome.question.id, admin.email
    );
    Ok(ok(outcome))
}

pub async fn reject_suggestion(
    suggestions: web::Data<SuggestionService>,
    admin: web::ReqData<AdminIdentity>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let id = validation::parse_id(&path, "suggestion")?;
    let suggestion = suggestions.reject(id).await?;
    info!("Suggestion #{} rejected by {}", id, admin.email);
    Ok(ok(suggestion))
}

pub async fn delete_suggestion(
    suggestions: web::Data<SuggestionService>,
    admin: web::ReqData<AdminIdentity>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let id = validation::parse_id(&path, "suggestion")?;
    suggestions.delete(id).await?;
    info!("Suggestion #{} deleted by {}", id, admin.email);
    Ok(no_content())
}
