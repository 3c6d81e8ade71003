//! Error handling module for the guestbook backend.
//!
//! Provides centralized error types with mapping to HTTP status codes and response bodies.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const INVALID_TOKEN: &str = "INVALID_TOKEN";
    pub const NOT_ADMIN: &str = "NOT_ADMIN";
    pub const WRONG_PASS: &str = "WRONG_PASS";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const TEXT_REQUIRED: &str = "TEXT_REQUIRED";
    pub const TITLE_REQUIRED: &str = "TITLE_REQUIRED";
    pub const CONTENT_REQUIRED: &str = "CONTENT_REQUIRED";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const UPSTREAM_ERROR: &str = "UPSTREAM_ERROR";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// Message returned to clients for any storage failure.
const STORAGE_FAILURE_MESSAGE: &str = "Failed to access guestbook data";

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Visitor OAuth token missing or rejected by the provider
    Unauthorized(String),
    /// Admin token missing, malformed or expired
    NotAdmin(String),
    /// Admin password did not match
    WrongPassword,
    /// Resource not found
    NotFound(String),
    /// A required field was missing or blank
    Required { code: &'static str, message: String },
    /// Validation error
    Validation(String),
    /// Malformed request body
    BadRequest(String),
    /// Identity provider could not be reached
    Upstream(String),
    /// Reading or writing the document failed
    Storage(String),
    /// Internal server error
    Internal(String),
}

impl AppError {
    /// Shorthand for a blank required field.
    pub fn required(code: &'static str, message: &str) -> Self {
        AppError::Required {
            code,
            message: message.to_string(),
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotAdmin(_) => StatusCode::UNAUTHORIZED,
            AppError::WrongPassword => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Required { .. } => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => codes::INVALID_TOKEN,
            AppError::NotAdmin(_) => codes::NOT_ADMIN,
            AppError::WrongPassword => codes::WRONG_PASS,
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::Required { code, .. } => *code,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::BadRequest(_) => codes::BAD_REQUEST,
            AppError::Upstream(_) => codes::UPSTREAM_ERROR,
            AppError::Storage(_) => codes::INTERNAL_ERROR,
            AppError::Internal(_) => codes::INTERNAL_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::Unauthorized(msg) => msg.clone(),
            AppError::NotAdmin(msg) => msg.clone(),
            AppError::WrongPassword => "Wrong admin password".to_string(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Required { message, .. } => message.clone(),
            AppError::Validation(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Upstream(msg) => msg.clone(),
            AppError::Storage(msg) => msg.clone(),
            AppError::Internal(msg) => msg.clone(),
        }
    }

    /// Message safe to hand back to the client.
    fn public_message(&self) -> String {
        match self {
            AppError::Storage(_) => STORAGE_FAILURE_MESSAGE.to_string(),
            _ => self.message(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("Storage I/O error: {:?}", err);
        AppError::Storage(format!("I/O error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("Document serialization error: {:?}", err);
        AppError::Storage(format!("JSON error: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        tracing::warn!("Identity provider request failed: {:?}", err);
        AppError::Upstream(format!("Identity provider unavailable: {}", err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: &AppError) -> Self {
        Self {
            error: error.error_code().to_string(),
            message: error.public_message(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::new(&self);
        (status, Json(body)).into_response()
    }
}
