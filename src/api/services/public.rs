//! Unauthenticated endpoints used by the portfolio site

use actix_web::{HttpResponse, Result as ActixResult, web};
use tracing::info;

use crate::services::validation;
use crate::services::{AnalyticsService, MetricsService, QuestionService, SuggestionService};

use super::response::{created, ok};
use super::types::{AnalyticsEventRequest, CreateSuggestionRequest, TrackQuestionRequest};

pub async fn list_questions(questions: web::Data<QuestionService>) -> ActixResult<HttpResponse> {
    Ok(ok(questions.list_active().await?))
}

pub async fn click_question(
    questions: web::Data<QuestionService>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let id = validation::parse_id(&path, "question")?;
    Ok(ok(questions.record_click(id).await?))
}

pub async fn track_question(
    questions: web::Data<QuestionService>,
    body: web::Json<TrackQuestionRequest>,
) -> ActixResult<HttpResponse> {
    let question = questions
        .track_usage(&body.text, body.category.as_deref())
        .await?;
    Ok(created(question))
}

pub async fn create_suggestion(
    suggestions: web::Data<SuggestionService>,
    body: web::Json<CreateSuggestionRequest>,
) -> ActixResult<HttpResponse> {
    let suggestion = suggestions
        .submit(&body.text, body.category.as_deref())
        .await?;
    info!("New suggestion #{} submitted", suggestion.id);
    Ok(created(suggestion))
}

pub async fn track_event(
    analytics: web::Data<AnalyticsService>,
    body: web::Json<AnalyticsEventRequest>,
) -> ActixResult<HttpResponse> {
    let event_type = validation::event_type(&body.event_type)?;
    Ok(created(analytics.track(event_type).await?))
}

pub async fn get_metrics(metrics: web::Data<MetricsService>) -> ActixResult<HttpResponse> {
    Ok(ok(metrics.summary().await?))
}
