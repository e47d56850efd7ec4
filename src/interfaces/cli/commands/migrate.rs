use anyhow::{Context, Result};
use colored::Colorize;
use tracing::info;

use crate::config::StaticConfig;
use crate::storage::StorageFactory;

/// Connecting runs every pending migration; nothing else is touched.
pub async fn run_migrate(config: &StaticConfig) -> Result<()> {
    let storage = StorageFactory::create(&config.database)
        .await
        .context("Migration failed")?;
    info!("Migrations applied on {}", storage.backend_name());
    println!(
        "{} ({})",
        "Database is up to date".green().bold(),
        storage.backend_name()
    );
    Ok(())
}
