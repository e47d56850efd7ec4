//! askme - backend for a portfolio "ask me anything" site
//!
//! Visitors browse a catalog of interview questions, record clicks and
//! submit suggestions; an administrator approves or rejects suggestions and
//! reads a metrics dashboard.
//!
//! # Architecture
//! - `api`: HTTP handlers, middleware (auth, rate limit, request id) and routing
//! - `services`: input validation and business operations
//! - `storage`: SeaORM persistence (SQLite / MySQL / PostgreSQL)
//! - `config`: TOML + environment configuration
//! - `runtime`: startup, server and shutdown
//! - `interfaces`: CLI commands
//! - `system`: logging

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
