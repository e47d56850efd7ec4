//! Admin credential seeding and login

use std::sync::Arc;

use askme::api::jwt::JwtService;
use askme::config::{AuthConfig, DatabaseConfig};
use askme::errors::AskmeError;
use askme::services::AuthService;
use askme::storage::StorageFactory;
use askme::utils::password::hash_password;
use tempfile::TempDir;

async fn setup() -> (TempDir, AuthService) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("auth_test.db");
    let config = DatabaseConfig {
        database_url: format!("sqlite://{}?mode=rwc", db_path.display()),
        ..DatabaseConfig::default()
    };
    let storage = StorageFactory::create(&config)
        .await
        .expect("Failed to create storage");
    let jwt = Arc::new(JwtService::new("auth-tests-secret-0123456789", 12));
    (temp_dir, AuthService::new(storage, jwt))
}

fn admin(email: &str, password: &str) -> AuthConfig {
    AuthConfig {
        admin_email: email.to_string(),
        admin_password_hash: hash_password(password).unwrap(),
        ..AuthConfig::default()
    }
}

fn is_invalid_credentials(err: &AskmeError) -> bool {
    matches!(err, AskmeError::Unauthorized(msg) if msg == "Invalid credentials")
}

#[tokio::test]
async fn test_login_with_seeded_admin() {
    let (_dir, auth) = setup().await;
    auth.seed_admin(&admin("Owner@Example.com", "s3cret-pass"))
        .await
        .unwrap();

    let result = auth.login(" owner@example.COM ", "s3cret-pass").await.unwrap();
    assert_eq!(result.expires_in, 12 * 3600);
    let claims = auth.jwt().validate_token(&result.token).unwrap();
    assert_eq!(claims.email, "owner@example.com");
}

#[tokio::test]
async fn test_changed_admin_email_retires_previous_account() {
    let (_dir, auth) = setup().await;

    auth.seed_admin(&admin("old@example.com", "old-password"))
        .await
        .unwrap();
    auth.login("old@example.com", "old-password").await.unwrap();

    auth.seed_admin(&admin("new@example.com", "new-password"))
        .await
        .unwrap();

    auth.login("new@example.com", "new-password").await.unwrap();
    let err = auth
        .login("old@example.com", "old-password")
        .await
        .unwrap_err();
    assert!(is_invalid_credentials(&err));
}

#[tokio::test]
async fn test_reseeding_same_email_replaces_password() {
    let (_dir, auth) = setup().await;

    auth.seed_admin(&admin("admin@example.com", "first-password"))
        .await
        .unwrap();
    auth.seed_admin(&admin("ADMIN@example.com", "second-password"))
        .await
        .unwrap();

    auth.login("admin@example.com", "second-password").await.unwrap();
    let err = auth
        .login("admin@example.com", "first-password")
        .await
        .unwrap_err();
    assert!(is_invalid_credentials(&err));
}

#[tokio::test]
async fn test_seed_without_hash_is_config_error() {
    let (_dir, auth) = setup().await;
    let config = AuthConfig {
        admin_email: "admin@example.com".to_string(),
        ..AuthConfig::default()
    };
    assert!(matches!(
        auth.seed_admin(&config).await,
        Err(AskmeError::Config(_))
    ));
}
