use actix_web::{HttpResponse, Result as ActixResult, web};
use tracing::info;

use crate::api::middleware::AdminIdentity;
use crate::services::QuestionService;
use crate::services::validation;

use super::super::response::ok;
use super::super::types::{SetActiveRequest, TopQuery};

pub async fn list_all_questions(questions: web::Data<QuestionService>) -> ActixResult<HttpResponse> {
    Ok(ok(questions.list_all().await?))
}

pub async fn top_questions(
    questions: web::Data<QuestionService>,
    query: web::Query<TopQuery>,
) -> ActixResult<HttpResponse> {
    let limit = validation::top_limit(query.limit.as_deref());
    Ok(ok(questions.top(limit).await?))
}

pub async fn set_question_active(
    questions: web::Data<QuestionService>,
    admin: web::ReqData<AdminIdentity>,
    path: web::Path<String>,
    body: web::Json<SetActiveRequest>,
) -> ActixResult<HttpResponse> {
    let id = validation::parse_id(&path, "question")?;
    let question = questions.set_active(id, body.is_active).await?;
    info!(
        "Question #{} set active={} by {}",
        id, question.is_active, admin.email
    );
    Ok(ok(question))
}
