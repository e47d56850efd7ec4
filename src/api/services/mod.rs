pub mod admin;
pub mod health;
pub mod public;
pub mod response;
pub mod types;

use actix_web::web;

use crate::api::middleware::RateLimit;
use crate::api::state::AppState;

pub use health::health_routes;
pub use response::{ApiResponse, ErrorResponse};

/// Public API routes
///
/// - GET /questions
/// - POST /questions/track
/// - POST /questions/{id}/click
/// - POST /suggestions (rate limited)
/// - POST /analytics/events
/// - GET /metrics
fn public_routes(cfg: &mut web::ServiceConfig, state: &AppState) {
    cfg.route("/questions", web::get().to(public::list_questions))
        .route("/questions/track", web::post().to(public::track_question))
        .route(
            "/questions/{id}/click",
            web::post().to(public::click_question),
        )
        .route(
            "/suggestions",
            web::post()
                .to(public::create_suggestion)
                .wrap(RateLimit::new(
                    state.suggestion_limiter.clone(),
                    state.trusted_proxies.clone(),
                )),
        )
        .route("/analytics/events", web::post().to(public::track_event))
        .route("/metrics", web::get().to(public::get_metrics));
}

/// Register shared state, extractor configs and every route.
///
/// Used by the server for each worker and by the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig, state: &AppState) {
    response::configure_extractors(cfg);
    cfg.app_data(web::Data::new(state.storage.clone()))
        .app_data(web::Data::new(state.questions.clone()))
        .app_data(web::Data::new(state.suggestions.clone()))
        .app_data(web::Data::new(state.analytics.clone()))
        .app_data(web::Data::new(state.metrics.clone()))
        .app_data(web::Data::new(state.auth.clone()))
        .service(health_routes())
        .service(
            web::scope("/api")
                .configure(|cfg| public_routes(cfg, state))
                .service(admin::routes::auth_routes(&state.login_limiter))
                .service(admin::routes::admin_routes(
                    state.auth.jwt(),
                    &state.login_limiter,
                )),
        );
}
