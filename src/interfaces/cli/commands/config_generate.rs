use std::path::Path;

use anyhow::{Context, Result, bail};
use colored::Colorize;

use crate::config::StaticConfig;

const DEFAULT_OUTPUT: &str = "config.example.toml";

pub fn run_config_generate(output_path: Option<String>, force: bool) -> Result<()> {
    let path = output_path.unwrap_or_else(|| DEFAULT_OUTPUT.to_string());

    if Path::new(&path).exists() && !force {
        bail!("{} already exists, use --force to overwrite", path);
    }

    let content = StaticConfig::generate_sample_config()?;
    std::fs::write(&path, content).with_context(|| format!("Failed to write {}", path))?;

    println!("{} {}", "Sample configuration written to".green(), path.bold());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "keep me").unwrap();
        let path_str = path.to_string_lossy().to_string();

        assert!(run_config_generate(Some(path_str.clone()), false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "keep me");

        run_config_generate(Some(path_str), true).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("[auth]"));
    }
}
