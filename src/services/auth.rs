//! Admin credential seeding and login

use std::sync::Arc;

use subtle::ConstantTimeEq;
use tracing::{info, warn};

use crate::api::jwt::JwtService;
use crate::config::AuthConfig;
use crate::errors::{AskmeError, Result};
use crate::storage::SeaOrmStorage;
use crate::utils::password::verify_password_or_dummy;

use super::validation;

/// The single message returned for every failed login
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug, Clone)]
pub struct LoginResult {
    pub token: String,
    pub expires_in: i64,
}

#[derive(Clone)]
pub struct AuthService {
    storage: Arc<SeaOrmStorage>,
    jwt: Arc<JwtService>,
}

impl AuthService {
    pub fn new(storage: Arc<SeaOrmStorage>, jwt: Arc<JwtService>) -> Self {
        Self { storage, jwt }
    }

    pub fn jwt(&self) -> Arc<JwtService> {
        Arc::clone(&self.jwt)
    }

    /// Make the configured admin the only account in the credential table.
    /// Called once at startup after `AuthConfig::prepare` has hashed any
    /// plaintext password.
    pub async fn seed_admin(&self, config: &AuthConfig) -> Result<()> {
        if config.admin_password_hash.is_empty() {
            return Err(AskmeError::config("auth.admin_password_hash is not set"));
        }
        self.storage
            .replace_admin_credential(&config.admin_email, &config.admin_password_hash)
            .await
    }

    /// Check email and password and issue a token.
    ///
    /// Unknown email and wrong password both fail with the same message and
    /// the same Argon2 cost.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResult> {
        let email = validation::login_input(email, password)?.to_lowercase();

        let credential = self.storage.find_admin_credential(&email).await?;
        let (stored_email, stored_hash) = match &credential {
            Some(c) => (c.email.clone(), Some(c.password_hash.clone())),
            None => (String::new(), None),
        };

        let password = password.to_string();
        let password_ok = tokio::task::spawn_blocking(move || {
            verify_password_or_dummy(&password, stored_hash.as_deref())
        })
        .await
        .map_err(|e| AskmeError::internal(format!("Password check task failed: {}", e)))??;

        let email_ok: bool = stored_email.as_bytes().ct_eq(email.as_bytes()).into();

        if !(email_ok && password_ok && credential.is_some()) {
            warn!("Admin login failed for {}", email);
            return Err(AskmeError::unauthorized(INVALID_CREDENTIALS));
        }

        let issued = self
            .jwt
            .issue_token(&email)
            .map_err(|e| AskmeError::internal(format!("Failed to sign token: {}", e)))?;

        info!("Admin login successful for {}", email);
        Ok(LoginResult {
            token: issued.token,
            expires_in: issued.expires_in,
        })
    }
}
