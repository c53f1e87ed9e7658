//! HTTP error mapping.
//!
//! Every failure becomes the original wire shape:
//! `{error, message}` with an optional per-field `errors` list for
//! validation failures. Internal detail is logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use triage_core::auth::AuthError;
use triage_core::lifecycle::UpdateError;
use triage_core::store::StoreError;

#[derive(Debug)]
pub enum ApiError {
    /// Malformed submission/update input; one message per offending field.
    Validation(Vec<String>),
    /// Missing or incorrect reviewer credential.
    Auth(AuthError),
    /// Referenced intake does not exist.
    IntakeNotFound,
    /// Update patch carried no recognized mutable field.
    NoFields,
    /// Admin password missing from server configuration.
    ServerMisconfigured,
    /// Persistence or unexpected failure; carries only the caller-facing
    /// context string, never the underlying detail.
    Internal(&'static str),
}

impl ApiError {
    /// Log the underlying failure and surface an opaque 500.
    pub fn internal(context: &'static str, err: StoreError) -> Self {
        tracing::error!(error = %err, "{context}");
        ApiError::Internal(context)
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        ApiError::Auth(e)
    }
}

impl From<UpdateError> for ApiError {
    fn from(e: UpdateError) -> Self {
        match e {
            UpdateError::NotFound { .. } => ApiError::IntakeNotFound,
            UpdateError::NoFields => ApiError::NoFields,
            UpdateError::Store(err) => ApiError::internal("Failed to update intake", err),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: "Validation Error",
                    message: "Invalid input".to_string(),
                    errors: Some(errors),
                },
            ),
            ApiError::Auth(AuthError::MissingCredential) => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    error: "Unauthorized",
                    message: "Authentication required. Use HTTP Basic Auth.".to_string(),
                    errors: None,
                },
            ),
            ApiError::Auth(AuthError::Denied) => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    error: "Unauthorized",
                    message: "Invalid credentials".to_string(),
                    errors: None,
                },
            ),
            ApiError::IntakeNotFound => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error: "Not Found",
                    message: "Intake not found".to_string(),
                    errors: None,
                },
            ),
            ApiError::NoFields => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: "Bad Request",
                    message: "No fields to update".to_string(),
                    errors: None,
                },
            ),
            ApiError::ServerMisconfigured => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: "Server Error",
                    message: "Admin password not configured".to_string(),
                    errors: None,
                },
            ),
            ApiError::Internal(context) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: "Internal Server Error",
                    message: context.to_string(),
                    errors: None,
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}
