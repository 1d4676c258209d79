//! Error handling module for the site backend.
//!
//! Provides centralized error types with mapping to HTTP status codes and JSON error bodies.

use axum::{
    extract::rejection::{BytesRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::AuthError;

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const METHOD_NOT_ALLOWED: &str = "METHOD_NOT_ALLOWED";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const PAYLOAD_TOO_LARGE: &str = "PAYLOAD_TOO_LARGE";
    pub const GONE: &str = "GONE";
    pub const NOT_CONFIGURED: &str = "NOT_CONFIGURED";
    pub const CONFIGURATION_ERROR: &str = "CONFIGURATION_ERROR";
    pub const DATABASE_ERROR: &str = "DATABASE_ERROR";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// Message shown in place of any internal fault.
const GENERIC_SERVER_ERROR: &str = "Internal server error";

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Missing, invalid or expired credentials
    Unauthorized(String),
    /// Resource not found
    NotFound(String),
    /// Known resource, unsupported method
    MethodNotAllowed,
    /// Payload failed validation; nothing was written
    Validation { message: String, issues: Vec<String> },
    /// Bad request (malformed JSON, bad path id)
    BadRequest(String),
    /// Request body over the configured limit
    PayloadTooLarge(String),
    /// Endpoint has been retired
    Gone { message: String, details: String },
    /// Database is not configured for this deployment
    NotConfigured(String),
    /// Server-side misconfiguration
    Configuration(String),
    /// Database error; the text is internal detail
    Storage(String),
    /// Internal server error
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Gone { .. } => StatusCode::GONE,
            AppError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => codes::UNAUTHORIZED,
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::MethodNotAllowed => codes::METHOD_NOT_ALLOWED,
            AppError::Validation { .. } => codes::VALIDATION_ERROR,
            AppError::BadRequest(_) => codes::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => codes::PAYLOAD_TOO_LARGE,
            AppError::Gone { .. } => codes::GONE,
            AppError::NotConfigured(_) => codes::NOT_CONFIGURED,
            AppError::Configuration(_) => codes::CONFIGURATION_ERROR,
            AppError::Storage(_) => codes::DATABASE_ERROR,
            AppError::Internal(_) => codes::INTERNAL_ERROR,
        }
    }

    /// Get the client-facing error message.
    pub fn message(&self) -> String {
        match self {
            AppError::Unauthorized(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::MethodNotAllowed => "Method not allowed".to_string(),
            AppError::Validation { message, .. } => message.clone(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::PayloadTooLarge(msg) => msg.clone(),
            AppError::Gone { message, .. } => message.clone(),
            AppError::NotConfigured(msg) => msg.clone(),
            AppError::Configuration(_) => "Server configuration error".to_string(),
            AppError::Storage(_) | AppError::Internal(_) => GENERIC_SERVER_ERROR.to_string(),
        }
    }

    /// Internal detail that must only reach trusted callers.
    pub fn internal_detail(&self) -> Option<&str> {
        match self {
            AppError::Configuration(msg) | AppError::Storage(msg) | AppError::Internal(msg) => {
                Some(msg.as_str())
            }
            _ => None,
        }
    }

    /// Build a validation error from collected issues.
    pub fn validation(issues: Vec<String>) -> Self {
        AppError::Validation {
            message: "Validation failed".to_string(),
            issues,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.internal_detail() {
            Some(detail) => write!(f, "{}: {}", self.error_code(), detail),
            None => write!(f, "{}: {}", self.error_code(), self.message()),
        }
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        AppError::Storage(format!("Database error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::debug!("JSON error: {:?}", err);
        AppError::BadRequest(format!("Invalid JSON body: {}", err))
    }
}

impl From<BytesRejection> for AppError {
    fn from(rejection: BytesRejection) -> Self {
        tracing::debug!("Body rejected: {}", rejection.body_text());
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge("Request body is too large".to_string())
        } else {
            AppError::BadRequest(rejection.body_text())
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!("Path rejected: {}", rejection.body_text());
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        tracing::debug!("Token rejected: {}", err);
        AppError::Unauthorized("Invalid token".to_string())
    }
}

/// JSON error body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: &AppError, expose_detail: bool) -> Self {
        let issues = match error {
            AppError::Validation { issues, .. } => Some(issues.clone()),
            _ => None,
        };

        let details = match error {
            AppError::Gone { details, .. } => Some(details.clone()),
            _ if expose_detail => error.internal_detail().map(str::to_string),
            _ => None,
        };

        Self {
            error: error.message(),
            code: error.error_code().to_string(),
            issues,
            details,
        }
    }
}

/// An error on its way to the client, carrying whether internal detail may be shown.
#[derive(Debug)]
pub struct ErrorReply {
    pub error: AppError,
    pub expose_detail: bool,
}

impl From<AppError> for ErrorReply {
    fn from(error: AppError) -> Self {
        Self {
            error,
            expose_detail: false,
        }
    }
}

impl IntoResponse for ErrorReply {
    fn into_response(self) -> Response {
        let status = self.error.status_code();
        if status.is_server_error() {
            tracing::warn!("Request failed: {}", self.error);
        }
        let body = ErrorResponse::new(&self.error, self.expose_detail);
        (status, Json(body)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        ErrorReply::from(self).into_response()
    }
}
