//! CLI command implementations

pub mod commands;

pub use commands::{run_config_generate, run_hash_password, run_migrate};
