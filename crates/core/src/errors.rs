use std::collections::BTreeMap;

use thiserror::Error;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

#[derive(Error, Debug)]
pub enum VolunteerError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Authentication required: {0}")]
    Unauthenticated(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type VolunteerResult<T> = Result<T, VolunteerError>;

impl VolunteerError {
    /// Per-field messages for a validation failure, keyed by field path
    /// (`availability[0].start_time`). Empty for every other variant.
    pub fn field_errors(&self) -> BTreeMap<String, Vec<String>> {
        let mut fields = BTreeMap::new();
        if let VolunteerError::Validation(errors) = self {
            collect_field_errors("", errors, &mut fields);
        }
        fields
    }
}

fn collect_field_errors(
    prefix: &str,
    errors: &ValidationErrors,
    out: &mut BTreeMap<String, Vec<String>>,
) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                out.entry(path)
                    .or_default()
                    .extend(field_errors.iter().map(describe));
            }
            ValidationErrorsKind::Struct(inner) => collect_field_errors(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_field_errors(&format!("{path}[{index}]"), inner, out);
                }
            }
        }
    }
}

fn describe(error: &ValidationError) -> String {
    match &error.message {
        Some(message) => message.to_string(),
        None => error.code.to_string(),
    }
}
