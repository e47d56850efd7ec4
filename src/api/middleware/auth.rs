use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, ResponseError,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::{Method, header::AUTHORIZATION},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::api::jwt::JwtService;
use crate::errors::AskmeError;

/// Identity of the authenticated admin, stored in request extensions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminIdentity {
    pub email: String,
}

/// Bearer-token authentication for the admin scope
#[derive(Clone)]
pub struct AdminAuth {
    jwt: Arc<JwtService>,
    /// Paths inside the scope served without a token
    public_paths: Arc<Vec<String>>,
}

impl AdminAuth {
    pub fn new(jwt: Arc<JwtService>) -> Self {
        Self {
            jwt,
            public_paths: Arc::new(Vec::new()),
        }
    }

    pub fn allow_path(mut self, path: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.public_paths).push(path.into());
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for AdminAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminAuthMiddleware {
            service: Rc::new(service),
            jwt: self.jwt.clone(),
            public_paths: self.public_paths.clone(),
        }))
    }
}

pub struct AdminAuthMiddleware<S> {
    service: Rc<S>,
    jwt: Arc<JwtService>,
    public_paths: Arc<Vec<String>>,
}

/// Pull the token out of `Authorization: Bearer <token>`.
fn extract_bearer_token(req: &ServiceRequest) -> Result<String, AskmeError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| AskmeError::unauthorized("Missing authorization header"))?;

    header
        .to_str()
        .ok()
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AskmeError::unauthorized("Invalid authorization header"))
}

impl<S> AdminAuthMiddleware<S> {
    fn authenticate(&self, req: &ServiceRequest) -> Result<AdminIdentity, AskmeError> {
        let token = extract_bearer_token(req)?;
        match self.jwt.validate_token(&token) {
            Ok(claims) => Ok(AdminIdentity {
                email: claims.email,
            }),
            Err(e) => {
                debug!("Bearer token validation failed: {}", e);
                Err(AskmeError::unauthorized("Invalid or expired token"))
            }
        }
    }
}

impl<S, B> Service<ServiceRequest> for AdminAuthMiddleware<S>
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

        // CORS preflight and public endpoints (login) pass through
        if req.method() == Method::OPTIONS || self.public_paths.iter().any(|p| p == req.path()) {
            trace!("{} bypasses admin authentication", req.path());
            return Box::pin(async move { Ok(srv.call(req).await?.map_into_left_body()) });
        }

        match self.authenticate(&req) {
            Ok(identity) => {
                trace!("Admin {} authenticated", identity.email);
                req.extensions_mut().insert(identity);
                Box::pin(async move { Ok(srv.call(req).await?.map_into_left_body()) })
            }
            Err(err) => {
                debug!("Admin authentication failed for {}: {}", req.path(), err);
                let response = err.error_response().map_into_right_body();
                Box::pin(async move { Ok(req.into_response(response)) })
            }
        }
    }
}
