//! JSON envelopes and extractor error handlers

use actix_web::{HttpRequest, HttpResponse, error, web};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::errors::AskmeError;

/// Success envelope: `{"data": ...}`
#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = "../frontend/src/api/types.generated.ts")]
pub struct ApiResponse<T> {
    pub data: T,
}

/// Error envelope: `{"error": "..."}`
#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = "../frontend/src/api/types.generated.ts")]
pub struct ErrorResponse {
    pub error: String,
}

pub fn ok<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse { data })
}

pub fn created<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Created().json(ApiResponse { data })
}

pub fn no_content() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

fn json_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("Rejected JSON body on {}: {}", req.path(), err);
    let message = match err {
        error::JsonPayloadError::ContentType => "Expected a JSON body".to_string(),
        error::JsonPayloadError::Overflow { .. }
        | error::JsonPayloadError::OverflowKnownLength { .. } => "Request body too large".to_string(),
        other => format!("Invalid JSON body: {}", other),
    };
    AskmeError::validation(message).into()
}

fn path_error(err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
    AskmeError::validation(format!("Invalid path: {}", err)).into()
}

fn query_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AskmeError::validation(format!("Invalid query string: {}", err)).into()
}

/// Route JSON / path / query extractor failures through [`AskmeError`].
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().limit(16 * 1024).error_handler(json_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .app_data(web::QueryConfig::default().error_handler(query_error));
}
