use axum::http::StatusCode;
use axum::response::IntoResponse;
use healtharmy_api::{
    config::{parse_log_level, parse_origins},
    middleware::error_handling::AppError,
};
use healtharmy_core::errors::VolunteerError;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::Value;
use tracing::Level;
use validator::{ValidationError, ValidationErrors};

use crate::test_utils::TestContext;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[rstest]
#[case::unauthenticated(VolunteerError::Unauthenticated("sign in".into()), StatusCode::UNAUTHORIZED)]
#[case::access_denied(VolunteerError::AccessDenied("nope".into()), StatusCode::FORBIDDEN)]
#[case::not_found(VolunteerError::NotFound("volunteer 9".into()), StatusCode::NOT_FOUND)]
#[case::constraint(VolunteerError::ConstraintViolation("check".into()), StatusCode::CONFLICT)]
#[case::storage(VolunteerError::StorageUnavailable(eyre::eyre!("pool timed out")), StatusCode::SERVICE_UNAVAILABLE)]
#[case::internal(VolunteerError::Internal("bad enum".into()), StatusCode::INTERNAL_SERVER_ERROR)]
#[tokio::test]
async fn test_error_status_mapping(#[case] error: VolunteerError, #[case] expected: StatusCode) {
    let message = error.to_string();

    let response = AppError(error).into_response();

    assert_eq!(response.status(), expected);
    let body = body_json(response).await;
    assert_eq!(body["error"], message);
    assert!(body.get("fields").is_none());
}

#[tokio::test]
async fn test_validation_error_lists_fields() {
    let mut errors = ValidationErrors::new();
    errors.add("phone", ValidationError::new("length").with_message("Telefone inválido".into()));

    let response = AppError(VolunteerError::Validation(errors)).into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["fields"]["phone"][0], "Telefone inválido");
}

#[rstest]
#[case("trace", Level::TRACE)]
#[case("DEBUG", Level::DEBUG)]
#[case("warn", Level::WARN)]
#[case("error", Level::ERROR)]
#[case("verbose", Level::INFO)]
fn test_parse_log_level(#[case] value: &str, #[case] expected: Level) {
    assert_eq!(parse_log_level(value), expected);
}

#[test]
fn test_parse_origins_skips_blanks() {
    assert_eq!(
        parse_origins("https://a.org, https://b.org ,,"),
        vec!["https://a.org".to_string(), "https://b.org".to_string()]
    );
}

#[tokio::test]
async fn test_health_and_version() {
    let ctx = TestContext::new();

    let health: Value = ctx.server.get("/health").await.json();
    assert_eq!(health["status"], "ok");

    let version: Value = ctx.server.get("/version").await.json();
    assert_eq!(version["name"], "healtharmy-api");
    assert!(version["version"].is_string());
}
