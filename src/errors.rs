use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::api::services::response::ErrorResponse;

/// Message returned to clients for every internal failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AskmeError {
    Validation(String),
    Unauthorized(String),
    NotFound(String),
    Conflict(String),
    RateLimited(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    Serialization(String),
    Config(String),
    Internal(String),
}

impl AskmeError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            AskmeError::Validation(_) => "E001",
            AskmeError::Unauthorized(_) => "E002",
            AskmeError::NotFound(_) => "E003",
            AskmeError::Conflict(_) => "E004",
            AskmeError::RateLimited(_) => "E005",
            AskmeError::DatabaseConfig(_) => "E006",
            AskmeError::DatabaseConnection(_) => "E007",
            AskmeError::DatabaseOperation(_) => "E008",
            AskmeError::Serialization(_) => "E009",
            AskmeError::Config(_) => "E010",
            AskmeError::Internal(_) => "E011",
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            AskmeError::Validation(_) => "Validation Error",
            AskmeError::Unauthorized(_) => "Unauthorized",
            AskmeError::NotFound(_) => "Resource Not Found",
            AskmeError::Conflict(_) => "Conflict",
            AskmeError::RateLimited(_) => "Rate Limited",
            AskmeError::DatabaseConfig(_) => "Database Configuration Error",
            AskmeError::DatabaseConnection(_) => "Database Connection Error",
            AskmeError::DatabaseOperation(_) => "Database Operation Error",
            AskmeError::Serialization(_) => "Serialization Error",
            AskmeError::Config(_) => "Configuration Error",
            AskmeError::Internal(_) => "Internal Error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AskmeError::Validation(msg)
            | AskmeError::Unauthorized(msg)
            | AskmeError::NotFound(msg)
            | AskmeError::Conflict(msg)
            | AskmeError::RateLimited(msg)
            | AskmeError::DatabaseConfig(msg)
            | AskmeError::DatabaseConnection(msg)
            | AskmeError::DatabaseOperation(msg)
            | AskmeError::Serialization(msg)
            | AskmeError::Config(msg)
            | AskmeError::Internal(msg) => msg,
        }
    }

    /// Errors whose details stay on the server.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AskmeError::DatabaseConfig(_)
                | AskmeError::DatabaseConnection(_)
                | AskmeError::DatabaseOperation(_)
                | AskmeError::Serialization(_)
                | AskmeError::Config(_)
                | AskmeError::Internal(_)
        )
    }

    /// Colored rendering for fatal errors on the console
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for AskmeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for AskmeError {}

// Constructors
impl AskmeError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        AskmeError::Validation(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        AskmeError::Unauthorized(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        AskmeError::NotFound(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        AskmeError::Conflict(msg.into())
    }

    pub fn rate_limited<T: Into<String>>(msg: T) -> Self {
        AskmeError::RateLimited(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        AskmeError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        AskmeError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        AskmeError::DatabaseOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        AskmeError::Serialization(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        AskmeError::Config(msg.into())
    }

    pub fn internal<T: Into<String>>(msg: T) -> Self {
        AskmeError::Internal(msg.into())
    }
}

impl From<sea_orm::DbErr> for AskmeError {
    fn from(err: sea_orm::DbErr) -> Self {
        AskmeError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for AskmeError {
    fn from(err: std::io::Error) -> Self {
        AskmeError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for AskmeError {
    fn from(err: serde_json::Error) -> Self {
        AskmeError::Serialization(err.to_string())
    }
}

impl ResponseError for AskmeError {
    fn status_code(&self) -> StatusCode {
        match self {
            AskmeError::Validation(_) => StatusCode::BAD_REQUEST,
            AskmeError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AskmeError::NotFound(_) => StatusCode::NOT_FOUND,
            AskmeError::Conflict(_) => StatusCode::CONFLICT,
            AskmeError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = if self.is_internal() {
            error!(code = self.code(), "{}", self.format_simple());
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.message().to_string()
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse { error: message })
    }
}

pub type Result<T> = std::result::Result<T, AskmeError>;
