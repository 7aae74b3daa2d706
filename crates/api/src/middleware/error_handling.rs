//! # Error Handling Middleware
//!
//! Maps [`VolunteerError`] onto HTTP status codes and JSON error bodies so
//! every handler fails the same way:
//!
//! ```json
//! { "error": "Validation error: ...", "fields": { "email": ["Email inválido"] } }
//! ```
//!
//! `fields` is only present for validation failures.

use std::borrow::Cow;

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use healtharmy_core::errors::VolunteerError;
use serde_json::json;
use tracing::error;
use validator::{ValidationError, ValidationErrors};

/// Application error wrapper that provides HTTP status code mapping
#[derive(Debug)]
pub struct AppError(pub VolunteerError);

pub fn status_for(err: &VolunteerError) -> StatusCode {
    match err {
        VolunteerError::Validation(_) => StatusCode::BAD_REQUEST,
        VolunteerError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
        VolunteerError::AccessDenied(_) => StatusCode::FORBIDDEN,
        VolunteerError::NotFound(_) => StatusCode::NOT_FOUND,
        VolunteerError::ConstraintViolation(_) => StatusCode::CONFLICT,
        VolunteerError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        VolunteerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            error!(error = ?self.0, "Request failed");
        }

        let message = self.0.to_string();
        let fields = self.0.field_errors();
        let body = if fields.is_empty() {
            json!({ "error": message })
        } else {
            json!({ "error": message, "fields": fields })
        };

        (status, Json(body)).into_response()
    }
}

impl From<VolunteerError> for AppError {
    fn from(err: VolunteerError) -> Self {
        AppError(err)
    }
}

/// A body that is not JSON, or does not fit the payload type (unknown enum
/// value, missing field), is a validation failure on `body`.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(
            "body",
            ValidationError::new("invalid_body").with_message(Cow::Owned(rejection.body_text())),
        );
        AppError(VolunteerError::Validation(errors))
    }
}

/// A volunteer id segment that is not a 32-bit integer fails like an id
/// below 1 does: a validation failure on `id`.
impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(
            "id",
            ValidationError::new("invalid_id").with_message(Cow::Owned(rejection.body_text())),
        );
        AppError(VolunteerError::Validation(errors))
    }
}
