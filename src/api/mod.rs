//! HTTP layer: JWT handling, middleware, handlers and route wiring

pub mod jwt;
pub mod middleware;
pub mod services;
pub mod state;

pub use state::AppState;
