pub mod auth;
pub mod rate_limit;
pub mod request_id;

pub use auth::{AdminAuth, AdminIdentity};
pub use rate_limit::{FixedWindowLimiter, RateLimit};
pub use request_id::RequestIdMiddleware;
