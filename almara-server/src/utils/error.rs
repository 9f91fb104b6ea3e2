//! Unified error handling
//!
//! [`AppError`] is the application-level error returned by HTTP handlers.
//! The wire format follows the dashboard contract:
//!
//! - single errors serialize as `{ "error": "..." }`
//! - collected validation failures as `{ "errors": [{ "msg": "..." }, ...] }`
//!
//! | variant | HTTP status |
//! |---------|-------------|
//! | Unauthorized | 401 |
//! | InvalidCredentials | 401 |
//! | NotFound | 404 |
//! | Conflict | 400 |
//! | Validation / ValidationErrors | 400 |
//! | Database / Internal | 500 |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::db::repository::RepoError;

/// Generic message for failed logins. Unknown email and wrong password are
/// deliberately indistinguishable.
pub const INVALID_CREDENTIALS_MSG: &str = "Invalid email or password";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource already exists: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Validation failed")]
    ValidationErrors(Vec<String>),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// `{ "error": "..." }`
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// `{ "errors": [{ "msg": "..." }, ...] }`
#[derive(Debug, Serialize)]
struct ErrorsBody {
    errors: Vec<ErrorItem>,
}

#[derive(Debug, Serialize)]
struct ErrorItem {
    msg: String,
}

fn single(status: StatusCode, message: impl Into<String>) -> Response {
    let body = ErrorBody {
        error: message.into(),
    };
    (status, Json(body)).into_response()
}

fn collected(status: StatusCode, messages: Vec<String>) -> Response {
    let body = ErrorsBody {
        errors: messages.into_iter().map(|msg| ErrorItem { msg }).collect(),
    };
    (status, Json(body)).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Unauthorized => single(StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::InvalidCredentials => collected(
                StatusCode::UNAUTHORIZED,
                vec![INVALID_CREDENTIALS_MSG.to_string()],
            ),
            AppError::NotFound(msg) => single(StatusCode::NOT_FOUND, msg),
            // Duplicate unique keys surface as 400 per the dashboard contract
            AppError::Conflict(msg) => single(StatusCode::BAD_REQUEST, msg),
            AppError::Validation(msg) => single(StatusCode::BAD_REQUEST, msg),
            AppError::ValidationErrors(msgs) => collected(StatusCode::BAD_REQUEST, msgs),
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                single(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                single(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Result type for HTTP handlers
pub type AppResult<T> = Result<T, AppError>;
