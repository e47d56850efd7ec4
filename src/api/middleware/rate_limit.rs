//! Fixed-window rate limiting for public write endpoints
//!
//! Each client key (its IP) may make `max` requests per window; the window
//! starts on the first request and resets once it has fully elapsed.

use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use actix_service::{Service, Transform};
use actix_web::{
    Error, ResponseError,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER},
};
use dashmap::DashMap;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{debug, info};

use crate::errors::AskmeError;
use crate::utils::ip::{UNKNOWN_CLIENT, client_ip};

pub const SUGGESTION_LIMIT_MESSAGE: &str = "Too many suggestions submitted. Please try again later.";

const HEADER_LIMIT: &str = "ratelimit-limit";
const HEADER_REMAINING: &str = "ratelimit-remaining";
const HEADER_RESET: &str = "ratelimit-reset";

/// Expired windows are swept after this many checks.
const SWEEP_EVERY: u64 = 1024;

#[derive(Debug, Clone, Copy)]
struct WindowState {
    started: Instant,
    count: u32,
}

/// Outcome of one check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_after: Duration,
}

impl RateDecision {
    /// Seconds until the window resets, rounded up.
    pub fn reset_secs(&self) -> u64 {
        let secs = self.reset_after.as_secs();
        if self.reset_after.subsec_nanos() > 0 {
            secs + 1
        } else {
            secs
        }
    }

    fn write_headers(&self, headers: &mut HeaderMap) {
        headers.insert(
            HeaderName::from_static(HEADER_LIMIT),
            HeaderValue::from(self.limit),
        );
        headers.insert(
            HeaderName::from_static(HEADER_REMAINING),
            HeaderValue::from(self.remaining),
        );
        headers.insert(
            HeaderName::from_static(HEADER_RESET),
            HeaderValue::from(self.reset_secs()),
        );
    }
}

/// Per-key fixed-window counter shared by all workers
pub struct FixedWindowLimiter {
    max: u32,
    window: Duration,
    windows: DashMap<String, WindowState>,
    checks: AtomicU64,
}

impl FixedWindowLimiter {
    pub fn new(max: u32, window: Duration) -> Self {
        Self {
            max,
            window,
            windows: DashMap::new(),
            checks: AtomicU64::new(0),
        }
    }

    pub fn from_minutes(max: u32, window_minutes: u64) -> Self {
        Self::new(max, Duration::from_secs(window_minutes * 60))
    }

    /// Count one request for `key`.
    pub fn check(&self, key: &str) -> RateDecision {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> RateDecision {
        let decision = {
            let mut state = self.windows.entry(key.to_string()).or_insert(WindowState {
                started: now,
                count: 0,
            });

            if now.saturating_duration_since(state.started) >= self.window {
                state.started = now;
                state.count = 0;
            }

            let allowed = state.count < self.max;
            if allowed {
                state.count += 1;
            }

            RateDecision {
                allowed,
                limit: self.max,
                remaining: self.max.saturating_sub(state.count),
                reset_after: self
                    .window
                    .saturating_sub(now.saturating_duration_since(state.started)),
            }
        };

        if self.checks.fetch_add(1, Ordering::Relaxed) % SWEEP_EVERY == SWEEP_EVERY - 1 {
            self.purge_expired(now);
        }

        decision
    }

    /// Drop windows that have fully elapsed.
    pub fn purge_expired(&self, now: Instant) {
        let before = self.windows.len();
        self.windows
            .retain(|_, state| now.saturating_duration_since(state.started) < self.window);
        let removed = before.saturating_sub(self.windows.len());
        if removed > 0 {
            debug!("Rate limiter purged {} expired windows", removed);
        }
    }

    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }
}

/// Middleware applying a [`FixedWindowLimiter`] keyed by client IP
#[derive(Clone)]
pub struct RateLimit {
    limiter: Arc<FixedWindowLimiter>,
    trusted_proxies: Arc<Vec<String>>,
}

impl RateLimit {
    pub fn new(limiter: Arc<FixedWindowLimiter>, trusted_proxies: Arc<Vec<String>>) -> Self {
        Self {
            limiter,
            trusted_proxies,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            config: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    config: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let key = client_ip(
            req.connection_info().peer_addr(),
            req.headers(),
            &self.config.trusted_proxies,
        )
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string());
        let decision = self.config.limiter.check(&key);

        if !decision.allowed {
            info!("Rate limit exceeded for {} on {}", key, req.path());
            let mut response = AskmeError::rate_limited(SUGGESTION_LIMIT_MESSAGE).error_response();
            decision.write_headers(response.headers_mut());
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(decision.reset_secs()));
            return Box::pin(async move { Ok(req.into_response(response.map_into_right_body())) });
        }

        Box::pin(async move {
            let mut response = srv.call(req).await?;
            decision.write_headers(response.headers_mut());
            Ok(response.map_into_left_body())
        })
    }
}
