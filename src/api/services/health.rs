use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, trace};

use crate::storage::SeaOrmStorage;

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
    database: &'static str,
}

/// Liveness plus a database round-trip
///
/// Talks to storage directly, health checks must not depend on business logic.
pub async fn health_check(storage: web::Data<Arc<SeaOrmStorage>>) -> impl Responder {
    trace!("Received health check request");

    match tokio::time::timeout(Duration::from_secs(5), storage.ping()).await {
        Ok(Ok(())) => HttpResponse::Ok().json(HealthBody {
            status: "ok",
            database: "up",
        }),
        Ok(Err(e)) => {
            error!("Health check: database ping failed: {}", e);
            HttpResponse::ServiceUnavailable().json(HealthBody {
                status: "degraded",
                database: "down",
            })
        }
        Err(_) => {
            error!("Health check: database ping timed out");
            HttpResponse::ServiceUnavailable().json(HealthBody {
                status: "degraded",
                database: "timeout",
            })
        }
    }
}

pub fn health_routes() -> actix_web::Scope {
    web::scope("/health")
        .route("", web::get().to(health_check))
        .route("", web::head().to(health_check))
}
