use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{AskmeError, Result};
use crate::utils::generate_random_code;
use crate::utils::password::{hash_password, is_argon2_hash};

/// Minimum accepted length of the JWT signing secret.
pub const MIN_JWT_SECRET_LEN: usize = 16;

/// Startup configuration (TOML file plus environment)
///
/// Sections:
/// - server: bind address and worker count
/// - database: connection URL, pool and retry settings
/// - auth: admin credential and token settings
/// - rate_limit: suggestion and login throttling
/// - cors: allowed origins for the front-end
/// - metrics: dashboard rollup settings
/// - logging: level, format and output
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// Load from a TOML file and `ASKME__*` environment variables
    ///
    /// Priority: ENV > TOML file > defaults.
    /// ENV prefix `ASKME`, separator `__`, e.g. `ASKME__SERVER__PORT=9999`.
    /// A `.env` file in the working directory is read first.
    pub fn load(path: Option<&str>) -> Result<Self> {
        use config::{Config, Environment, File};

        dotenvy::dotenv().ok();

        let (path, required) = match path {
            Some(p) => (p, true),
            None => ("config.toml", false),
        };

        let builder = Config::builder()
            .add_source(File::with_name(path).required(required))
            .add_source(
                Environment::with_prefix("ASKME")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("rate_limit.trusted_proxies")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            );

        let settings = builder
            .build()
            .map_err(|e| AskmeError::config(format!("Failed to build config: {}", e)))?;
        let config = settings
            .try_deserialize::<StaticConfig>()
            .map_err(|e| AskmeError::config(format!("Failed to deserialize config: {}", e)))?;

        if std::path::Path::new(path).exists() {
            eprintln!("[INFO] Configuration loaded from: {}", path);
        }
        Ok(config)
    }

    /// Fill derived values and validate.
    ///
    /// A plaintext `auth.admin_password` is hashed when no hash is set, and an
    /// empty JWT secret is replaced by a random one (tokens then do not
    /// survive a restart).
    pub fn prepare(&mut self) -> Result<()> {
        if self.auth.admin_password_hash.is_empty()
            && let Some(plain) = self.auth.admin_password.take()
            && !plain.is_empty()
        {
            warn!("auth.admin_password is set in plaintext; prefer auth.admin_password_hash");
            self.auth.admin_password_hash = hash_password(&plain)?;
        }

        if self.auth.jwt_secret.is_empty() {
            warn!("auth.jwt_secret is empty, generating a random secret for this process");
            self.auth.jwt_secret = generate_random_code(48);
        }

        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if self.auth.admin_email.trim().is_empty() {
            return Err(AskmeError::config("auth.admin_email must be set"));
        }
        if self.auth.admin_password_hash.is_empty() {
            return Err(AskmeError::config(
                "auth.admin_password_hash (or auth.admin_password) must be set",
            ));
        }
        if !is_argon2_hash(&self.auth.admin_password_hash) {
            return Err(AskmeError::config(
                "auth.admin_password_hash is not an Argon2 PHC string",
            ));
        }
        if self.auth.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(AskmeError::config(format!(
                "auth.jwt_secret must be at least {} characters",
                MIN_JWT_SECRET_LEN
            )));
        }
        if self.auth.token_ttl_hours == 0 {
            return Err(AskmeError::config("auth.token_ttl_hours must be positive"));
        }
        if self.rate_limit.suggestion_window_minutes == 0 || self.rate_limit.suggestion_max == 0 {
            return Err(AskmeError::config(
                "rate_limit.suggestion_window_minutes and rate_limit.suggestion_max must be positive",
            ));
        }
        if self.rate_limit.login_seconds_per_request == 0 || self.rate_limit.login_burst == 0 {
            return Err(AskmeError::config(
                "rate_limit.login_seconds_per_request and rate_limit.login_burst must be positive",
            ));
        }
        Ok(())
    }
}

/// HTTP listener
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

/// Database connection and retry settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
    /// Connect/acquire timeout in seconds
    #[serde(default = "default_database_timeout")]
    pub timeout: u64,
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,
}

/// Admin credential and token settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_admin_email")]
    pub admin_email: String,
    /// Argon2id PHC string, see `askme hash-password`
    #[serde(default)]
    pub admin_password_hash: String,
    /// Plaintext fallback, hashed at startup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_password: Option<String>,
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_suggestion_window_minutes")]
    pub suggestion_window_minutes: u64,
    #[serde(default = "default_suggestion_max")]
    pub suggestion_max: u32,
    #[serde(default = "default_login_seconds_per_request")]
    pub login_seconds_per_request: u64,
    #[serde(default = "default_login_burst")]
    pub login_burst: u32,
    /// Proxies (IP or CIDR) whose forwarding headers are trusted
    #[serde(default)]
    pub trusted_proxies: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_cors_enabled")]
    pub enabled: bool,
    /// `*` allows any origin
    #[serde(default = "default_cors_origins")]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_cors_max_age")]
    pub max_age: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_top_questions")]
    pub top_questions: u64,
}

/// Log level, format and output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// `text` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    4000
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_database_url() -> String {
    "askme.db".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_database_timeout() -> u64 {
    8
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    100
}

fn default_retry_max_delay_ms() -> u64 {
    2000
}

fn default_admin_email() -> String {
    "admin@example.com".to_string()
}

fn default_token_ttl_hours() -> u64 {
    12
}

fn default_suggestion_window_minutes() -> u64 {
    15
}

fn default_suggestion_max() -> u32 {
    5
}

fn default_login_seconds_per_request() -> u64 {
    2
}

fn default_login_burst() -> u32 {
    5
}

fn default_cors_enabled() -> bool {
    true
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:5173".to_string()]
}

fn default_cors_max_age() -> u64 {
    3600
}

fn default_top_questions() -> u64 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
            timeout: default_database_timeout(),
            retry_count: default_retry_count(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_email: default_admin_email(),
            admin_password_hash: String::new(),
            admin_password: None,
            jwt_secret: String::new(),
            token_ttl_hours: default_token_ttl_hours(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            suggestion_window_minutes: default_suggestion_window_minutes(),
            suggestion_max: default_suggestion_max(),
            login_seconds_per_request: default_login_seconds_per_request(),
            login_burst: default_login_burst(),
            trusted_proxies: Vec::new(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: default_cors_enabled(),
            allowed_origins: default_cors_origins(),
            max_age: default_cors_max_age(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            top_questions: default_top_questions(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}
