//! Admin API routes

use std::sync::Arc;

use actix_governor::Governor;
use actix_web::dev::HttpServiceFactory;
use actix_web::web;

use crate::api::jwt::JwtService;
use crate::api::middleware::AdminAuth;

use super::auth::{LoginLimiterConfig, login};
use super::questions::{list_all_questions, set_question_active, top_questions};
use super::suggestions::{
    approve_suggestion, delete_suggestion, list_suggestions, reject_suggestion,
};

/// Public path of the admin login inside the admin scope
pub const ADMIN_LOGIN_PATH: &str = "/api/admin/login";

/// Question management `/questions`
///
/// - GET /questions - all questions, hidden included
/// - GET /questions/top?limit= - most clicked
/// - PATCH /questions/{id} - hide or unhide
fn questions_routes() -> actix_web::Scope {
    web::scope("/questions")
        .route("", web::get().to(list_all_questions))
        .route("/top", web::get().to(top_questions))
        .route("/{id}", web::patch().to(set_question_active))
}

/// Suggestion moderation `/suggestions`
///
/// - GET /suggestions?status= - filter by status
/// - POST /suggestions/{id}/approve - approve into a question
/// - POST /suggestions/{id}/reject
/// - DELETE /suggestions/{id} - pending only
fn suggestions_routes() -> actix_web::Scope {
    web::scope("/suggestions")
        .route("", web::get().to(list_suggestions))
        .route("/{id}/approve", web::post().to(approve_suggestion))
        .route("/{id}/reject", web::post().to(reject_suggestion))
        .route("/{id}", web::delete().to(delete_suggestion))
}

/// Admin scope `/admin`, bearer-protected except for `/admin/login`.
pub fn admin_routes(
    jwt: Arc<JwtService>,
    login_limiter: &LoginLimiterConfig,
) -> impl HttpServiceFactory + use<> {
    web::scope("/admin")
        .wrap(AdminAuth::new(jwt).allow_path(ADMIN_LOGIN_PATH))
        .route(
            "/login",
            web::post().to(login).wrap(Governor::new(login_limiter)),
        )
        .service(questions_routes())
        .service(suggestions_routes())
}

/// Auth routes `/auth`
pub fn auth_routes(login_limiter: &LoginLimiterConfig) -> actix_web::Scope {
    web::scope("/auth").route(
        "/login",
        web::post().to(login).wrap(Governor::new(login_limiter)),
    )
}
