//! Login endpoint and login rate limiting

use std::sync::Arc;

use actix_governor::{GovernorConfig, GovernorConfigBuilder, KeyExtractor, SimpleKeyExtractionError};
use actix_web::dev::ServiceRequest;
use actix_web::{HttpResponse, Result as ActixResult, web};
use governor::middleware::NoOpMiddleware;
use tracing::debug;

use crate::config::RateLimitConfig;
use crate::errors::{AskmeError, Result};
use crate::services::AuthService;
use crate::utils::ip::client_ip;

use super::super::response::ok;
use super::super::types::{LoginRequest, LoginResponse};

/// Keys the login limiter by client IP
///
/// Same resolution rules as the suggestion limiter: peer address, or the
/// forwarded address when the peer is a trusted (or, with none configured,
/// private) proxy.
#[derive(Clone)]
pub struct LoginKeyExtractor {
    trusted_proxies: Arc<Vec<String>>,
}

impl LoginKeyExtractor {
    pub fn new(trusted_proxies: Arc<Vec<String>>) -> Self {
        Self { trusted_proxies }
    }
}

impl KeyExtractor for LoginKeyExtractor {
    type Key = String;
    type KeyExtractionError = SimpleKeyExtractionError<&'static str>;

    fn extract(&self, req: &ServiceRequest) -> std::result::Result<Self::Key, Self::KeyExtractionError> {
        let key = client_ip(
            req.connection_info().peer_addr(),
            req.headers(),
            &self.trusted_proxies,
        )
        .ok_or_else(|| SimpleKeyExtractionError::new("Unable to extract client IP"))?;
        debug!("Login rate limit key: {}", key);
        Ok(key)
    }
}

pub type LoginLimiterConfig = GovernorConfig<LoginKeyExtractor, NoOpMiddleware>;

/// Build the shared login limiter: one token every
/// `login_seconds_per_request` seconds, bursts up to `login_burst`.
///
/// Build it once and hand clones to every worker so all workers share the
/// same buckets.
pub fn login_limiter_config(
    config: &RateLimitConfig,
    trusted_proxies: Arc<Vec<String>>,
) -> Result<LoginLimiterConfig> {
    GovernorConfigBuilder::default()
        .seconds_per_request(config.login_seconds_per_request)
        .burst_size(config.login_burst)
        .key_extractor(LoginKeyExtractor::new(trusted_proxies))
        .finish()
        .ok_or_else(|| {
            AskmeError::config(format!(
                "Invalid login rate limit: {}s per request, burst {}",
                config.login_seconds_per_request, config.login_burst
            ))
        })
}

/// `POST /api/auth/login` and `POST /api/admin/login`
pub async fn login(
    auth: web::Data<AuthService>,
    body: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    let result = auth.login(&body.email, &body.password).await?;
    Ok(ok(LoginResponse {
        token: result.token,
        expires_in: result.expires_in,
    }))
}
