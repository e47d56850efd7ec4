use super::StaticConfig;
use crate::errors::{AskmeError, Result};

impl StaticConfig {
    /// Render a sample TOML file with every default filled in.
    pub fn generate_sample_config() -> Result<String> {
        toml::to_string_pretty(&Self::default())
            .map_err(|e| AskmeError::config(format!("Failed to render sample config: {}", e)))
    }
}
