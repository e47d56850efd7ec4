use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::api::AppState;
use crate::config::StaticConfig;
use crate::storage::StorageFactory;

/// Open storage, seed the admin credential and build the shared state.
pub async fn prepare_server_startup(config: &StaticConfig) -> Result<AppState> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage = StorageFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());

    let state = AppState::new(Arc::clone(&storage), config).context("Failed to build app state")?;

    state
        .auth
        .seed_admin(&config.auth)
        .await
        .context("Failed to seed admin credential")?;

    if config.rate_limit.trusted_proxies.is_empty() {
        warn!(
            "Rate limiting: auto-detect mode. Connections from private IPs will use \
             X-Forwarded-For. Configure rate_limit.trusted_proxies to disable."
        );
    } else {
        info!(
            "Rate limiting: trusted proxies {:?}",
            config.rate_limit.trusted_proxies
        );
    }

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );
    Ok(state)
}
