//! Unified error handling for the account core.
//!
//! Provides a single error type with a stable kind (`code`), an HTTP status
//! for boundary layers, and an Axum response rendering.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Account errors
    #[error("User is not found")]
    NotFound,

    #[error("Password incorrect")]
    InvalidCredentials,

    #[error("Username already exist")]
    UsernameConflict,

    #[error("Email already exist")]
    EmailConflict,

    #[error("Password does not match")]
    PasswordMismatch,

    // Credential and token work
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token signing failed: {0}")]
    Signing(String),

    // Persistence
    #[cfg(feature = "database")]
    #[error("Database server failed in executing query")]
    Store(#[from] sea_orm::DbErr),

    // Boundary categories (raised by request authentication / transport)
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Too many requests")]
    TooManyRequests,

    // Internal
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Internal server error")]
    Internal(String),
}

/// Error response body for HTTP
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound => "NOT_FOUND",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::UsernameConflict => "USERNAME_CONFLICT",
            AppError::EmailConflict => "EMAIL_CONFLICT",
            AppError::PasswordMismatch => "PASSWORD_MISMATCH",
            AppError::Hashing(_) => "HASHING_ERROR",
            AppError::Signing(_) => "SIGNING_ERROR",
            #[cfg(feature = "database")]
            AppError::Store(_) => "STORE_ERROR",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::InvalidToken => "INVALID_TOKEN",
            AppError::TooManyRequests => "TOO_MANY_REQUESTS",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::InvalidCredentials | AppError::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::UsernameConflict | AppError::EmailConflict => StatusCode::CONFLICT,
            AppError::PasswordMismatch => StatusCode::BAD_REQUEST,
            AppError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether this error means a login attempt was rejected.
    ///
    /// Unknown usernames and wrong passwords stay distinct kinds internally
    /// but collapse into one authentication failure at a login boundary.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, AppError::NotFound | AppError::InvalidCredentials)
    }

    /// Whether this error reports a username or email uniqueness conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, AppError::UsernameConflict | AppError::EmailConflict)
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            #[cfg(feature = "database")]
            AppError::Store(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Hashing(msg) => {
                tracing::error!("Hashing error: {}", msg);
                "An internal error occurred".to_string()
            }
            AppError::Signing(msg) => {
                tracing::error!("Signing error: {}", msg);
                "An internal error occurred".to_string()
            }
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {}", msg);
                "An internal error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            // Use default message for others
            _ => self.to_string(),
        }
    }
}

// =============================================================================
// HTTP Response (Axum)
// =============================================================================

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn hashing(msg: impl std::fmt::Display) -> Self {
        AppError::Hashing(msg.to_string())
    }

    pub fn signing(msg: impl std::fmt::Display) -> Self {
        AppError::Signing(msg.to_string())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        AppError::Configuration(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
