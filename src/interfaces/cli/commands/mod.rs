mod config_generate;
mod hash_password;
mod migrate;

pub use config_generate::run_config_generate;
pub use hash_password::run_hash_password;
pub use migrate::run_migrate;
