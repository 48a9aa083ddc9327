//! Error types for the bookstore server

use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rand::{distributions::Alphanumeric, Rng};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Length of the correlation token attached to every error response
const ERROR_ID_LEN: usize = 9;

static EXPOSE_DETAILS: AtomicBool = AtomicBool::new(false);

/// Enable or disable the `detail` field in error responses (development only)
pub fn set_expose_details(expose: bool) {
    EXPOSE_DETAILS.store(expose, Ordering::Relaxed);
}

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    /// Dotted path of the offending field (e.g. `author.name`)
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        errors: Vec<FieldError>,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Validation failure without field-level detail
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// Validation failure carrying one entry per violated field
    pub fn invalid_fields(errors: Vec<FieldError>) -> Self {
        AppError::Validation {
            message: "Validation failed".to_string(),
            errors,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to clients. Server-side failures never leak their cause.
    pub fn public_message(&self) -> String {
        match self {
            AppError::MalformedPayload(_) => "Invalid request payload".to_string(),
            AppError::Validation { message, .. } => message.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Persistence(_) => "Database error occurred".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

/// Inner part of the error envelope
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub message: String,
    pub status: u16,
    /// Random token for cross-referencing server logs
    pub error_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
    /// Debug rendering of the error, development mode only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Error response body: `{"error": {...}}`
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

impl ErrorResponse {
    pub fn from_error(err: &AppError, error_id: String, expose_details: bool) -> Self {
        let errors = match err {
            AppError::Validation { errors, .. } if !errors.is_empty() => Some(errors.clone()),
            _ => None,
        };

        ErrorResponse {
            error: ErrorBody {
                message: err.public_message(),
                status: err.status().as_u16(),
                error_id,
                errors,
                detail: expose_details.then(|| format!("{:?}", err)),
            },
        }
    }
}

/// Short random correlation token
pub fn generate_error_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ERROR_ID_LEN)
        .map(|c| char::from(c).to_ascii_lowercase())
        .collect()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_id = generate_error_id();

        match &self {
            AppError::Persistence(context) => {
                tracing::error!(error_id = %error_id, "Database error: {}", context);
            }
            AppError::Internal(e) => {
                tracing::error!(error_id = %error_id, "Internal error: {:?}", e);
            }
            AppError::MalformedPayload(detail) => {
                tracing::warn!(error_id = %error_id, "Malformed payload: {}", detail);
            }
            AppError::Validation { message, errors } => {
                tracing::warn!(error_id = %error_id, ?errors, "Validation error: {}", message);
            }
            AppError::NotFound(msg) => {
                tracing::warn!(error_id = %error_id, "Not found: {}", msg);
            }
        }

        let body = ErrorResponse::from_error(&self, error_id, EXPOSE_DETAILS.load(Ordering::Relaxed));

        (status, Json(body)).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
