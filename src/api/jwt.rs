use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Admin session claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// A freshly signed token and its lifetime in seconds
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
}

/// JWT Service for generating and validating admin tokens (HS256)
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl: Duration,
}

impl JwtService {
    pub fn new(secret: &str, token_ttl_hours: u64) -> Self {
        let mut validation = Validation::default();
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            token_ttl: Duration::hours(token_ttl_hours as i64),
        }
    }

    pub fn from_config(config: &crate::config::AuthConfig) -> Self {
        Self::new(&config.jwt_secret, config.token_ttl_hours)
    }

    pub fn issue_token(&self, email: &str) -> Result<IssuedToken, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = AdminClaims {
            sub: email.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok(IssuedToken {
            token,
            expires_in: self.token_ttl.num_seconds(),
        })
    }

    /// Check signature and expiry.
    pub fn validate_token(&self, token: &str) -> Result<AdminClaims, jsonwebtoken::errors::Error> {
        let token_data = decode::<AdminClaims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_secret_key_32_bytes_long!!";

    fn create_test_service() -> JwtService {
        JwtService::new(SECRET, 12)
    }

    #[test]
    fn test_issue_and_validate_token() {
        let service = create_test_service();
        let issued = service.issue_token("admin@example.com").unwrap();
        let claims = service.validate_token(&issued.token).unwrap();

        assert_eq!(claims.email, "admin@example.com");
        assert_eq!(claims.sub, "admin@example.com");
        assert_eq!(claims.exp - claims.iat, 12 * 3600);
        assert_eq!(issued.expires_in, 12 * 3600);
    }

    #[test]
    fn test_tokens_are_unique() {
        let service = create_test_service();
        let a = service.issue_token("admin@example.com").unwrap();
        let b = service.issue_token("admin@example.com").unwrap();
        assert_ne!(a.token, b.token);
    }

    #[test]
    fn test_invalid_token_rejected() {
        let service = create_test_service();
        assert!(service.validate_token("invalid.token.here").is_err());
        assert!(service.validate_token("").is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let service1 = create_test_service();
        let service2 = JwtService::new("different_secret_key_32_bytes!!", 12);

        let issued = service1.issue_token("admin@example.com").unwrap();
        assert!(service2.validate_token(&issued.token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = create_test_service();

        // expired well beyond the default leeway
        let now = Utc::now();
        let claims = AdminClaims {
            sub: "admin@example.com".to_string(),
            email: "admin@example.com".to_string(),
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let result = service.validate_token(&token);
        assert!(
            result.is_err(),
            "Expected expired token to be rejected, but got: {:?}",
            result
        );
    }
}
