pub mod user;
pub mod volunteer;

use healtharmy_core::errors::VolunteerError;
use sqlx::error::ErrorKind;

/// Classifies a failed storage call. Constraint violations reported by
/// PostgreSQL are the caller's fault; anything else means storage could not
/// serve the request.
pub fn storage_error(report: eyre::Report) -> VolunteerError {
    let violation = report
        .downcast_ref::<sqlx::Error>()
        .and_then(|err| err.as_database_error())
        .filter(|db| {
            matches!(
                db.kind(),
                ErrorKind::UniqueViolation
                    | ErrorKind::ForeignKeyViolation
                    | ErrorKind::NotNullViolation
                    | ErrorKind::CheckViolation
            )
        })
        .map(|db| db.message().to_string());

    match violation {
        Some(message) => VolunteerError::ConstraintViolation(message),
        None => VolunteerError::StorageUnavailable(report),
    }
}
