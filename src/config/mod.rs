//! Static configuration loaded from TOML and environment variables.

mod r#impl;
mod structs;

pub use structs::*;
