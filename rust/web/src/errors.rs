//! HTTP error handling for montyhall_web
//!
//! Every API failure is rendered as an [`ErrorResponse`] body with a status
//! code and logged at a level chosen from its [`ErrorSeverity`].
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use warp::http::StatusCode;
use warp::reply::{self, Response};
use warp::{Rejection, Reply};

/// Standard error response format for all API endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g., "invalid_game_result")
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (structured data)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        error: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn into_response(self, status: StatusCode) -> Response {
        reply::with_status(reply::json(&self), status).into_response()
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// Error classification for logging levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Client errors (4xx), logged at info
    Client,
    /// Server errors (5xx), logged at error
    Server,
}

/// Trait for converting errors to HTTP responses with proper logging
pub trait IntoErrorResponse {
    fn status_code(&self) -> StatusCode;

    /// Machine-readable error code
    fn error_code(&self) -> &'static str;

    /// Human-readable error message
    fn error_message(&self) -> String;

    fn error_details(&self) -> Option<serde_json::Value> {
        None
    }

    fn severity(&self) -> ErrorSeverity {
        if self.status_code().is_server_error() {
            ErrorSeverity::Server
        } else {
            ErrorSeverity::Client
        }
    }

    fn to_error_response(&self) -> ErrorResponse {
        if let Some(details) = self.error_details() {
            ErrorResponse::with_details(self.error_code(), self.error_message(), details)
        } else {
            ErrorResponse::new(self.error_code(), self.error_message())
        }
    }

    fn into_http_response(self) -> Response
    where
        Self: Sized,
    {
        let status = self.status_code();
        let severity = self.severity();
        let error_response = self.to_error_response();

        match severity {
            ErrorSeverity::Client => tracing::info!(
                error = %error_response.error,
                message = %error_response.message,
                "client error"
            ),
            ErrorSeverity::Server => tracing::error!(
                error = %error_response.error,
                message = %error_response.message,
                "server error"
            ),
        }

        error_response.into_response(status)
    }
}

/// Failures surfaced by the HTTP API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid game result data: {0}")]
    InvalidGameResult(String),
    #[error("Resource not found")]
    NotFound,
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Origin not allowed: {0}")]
    CorsForbidden(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoErrorResponse for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidGameResult(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::CorsForbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ApiError::InvalidGameResult(_) => "invalid_game_result",
            ApiError::NotFound => "not_found",
            ApiError::MethodNotAllowed => "method_not_allowed",
            ApiError::CorsForbidden(_) => "cors_forbidden",
            ApiError::Internal(_) => "internal_error",
        }
    }

    fn error_message(&self) -> String {
        match self {
            ApiError::InvalidGameResult(_) => "Invalid game result data".to_string(),
            other => other.to_string(),
        }
    }

    fn error_details(&self) -> Option<serde_json::Value> {
        match self {
            ApiError::InvalidGameResult(reason) => {
                Some(serde_json::json!({ "reason": reason }))
            }
            _ => None,
        }
    }
}

/// Turn warp rejections into JSON error bodies. Never fails.
pub async fn handle_rejection(err: Rejection) -> Result<Response, Rejection> {
    let api_error = if err.is_not_found() {
        ApiError::NotFound
    } else if let Some(cors) = err.find::<warp::cors::CorsForbidden>() {
        ApiError::CorsForbidden(cors.to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        ApiError::MethodNotAllowed
    } else {
        ApiError::Internal(format!("{err:?}"))
    };
    Ok(api_error.into_http_response())
}
