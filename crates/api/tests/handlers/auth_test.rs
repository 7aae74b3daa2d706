use std::sync::Arc;

use axum::http::{header::AUTHORIZATION, StatusCode};
use chrono::Utc;
use healtharmy_api::middleware::auth::{bearer_token, SupabaseTokenVerifier, TokenVerifier};
use healtharmy_core::{
    errors::VolunteerError,
    models::principal::{Role, User},
};
use healtharmy_db::mock::{memory::InMemoryVolunteerRepository, repositories::MockUserRepo};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::test_utils::{bearer, build_server, TestContext, ADMIN_TOKEN, ANA_TOKEN, BROKEN_TOKEN};

#[tokio::test]
async fn test_me_is_null_without_token() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/api/auth/me").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), Value::Null);
}

#[tokio::test]
async fn test_me_returns_user_created_on_first_request() {
    let ctx = TestContext::new();

    let body: Value = ctx
        .server
        .get("/api/auth/me")
        .add_header(AUTHORIZATION, bearer(ANA_TOKEN))
        .await
        .json();

    assert_eq!(body["email"], "ana@x.com");
    assert_eq!(body["name"], "Ana");
    assert_eq!(body["role"], "user");
}

#[tokio::test]
async fn test_owner_becomes_admin() {
    let ctx = TestContext::new();

    let body: Value = ctx
        .server
        .get("/api/auth/me")
        .add_header(AUTHORIZATION, bearer(ADMIN_TOKEN))
        .await
        .json();

    assert_eq!(body["role"], "admin");
    assert_eq!(body["id"], ctx.owner_id.to_string());
}

#[test_log::test(tokio::test)]
async fn test_unusable_tokens_are_anonymous() {
    let ctx = TestContext::new();

    for token in ["unknown-token", BROKEN_TOKEN] {
        let response = ctx
            .server
            .get("/api/auth/me")
            .add_header(AUTHORIZATION, bearer(token))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), Value::Null);
    }

    ctx.server
        .get("/api/volunteers")
        .add_header(AUTHORIZATION, bearer(BROKEN_TOKEN))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[test]
fn test_bearer_token_parsing() {
    let mut headers = axum::http::HeaderMap::new();
    assert_eq!(bearer_token(&headers), None);

    headers.insert(AUTHORIZATION, "Basic abc".parse().unwrap());
    assert_eq!(bearer_token(&headers), None);

    headers.insert(AUTHORIZATION, "Bearer ".parse().unwrap());
    assert_eq!(bearer_token(&headers), None);

    headers.insert(AUTHORIZATION, "Bearer abc.def".parse().unwrap());
    assert_eq!(bearer_token(&headers), Some("abc.def"));
}

#[tokio::test]
async fn test_supabase_verifier_reads_identity() {
    let server = MockServer::start().await;
    let user_id = Uuid::new_v4();
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("apikey", "service-key"))
        .and(header("authorization", "Bearer good"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": user_id,
            "email": "ana@x.com",
            "user_metadata": { "name": "Ana" }
        })))
        .mount(&server)
        .await;

    let verifier = SupabaseTokenVerifier::new(&server.uri(), "service-key").unwrap();
    let identity = verifier.verify("good").await.unwrap().unwrap();

    assert_eq!(identity.id, user_id);
    assert_eq!(identity.email, "ana@x.com");
    assert_eq!(identity.name.as_deref(), Some("Ana"));
}

#[tokio::test]
async fn test_supabase_verifier_rejections() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("authorization", "Bearer expired"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(header("authorization", "Bearer phone-only"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": Uuid::new_v4() })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(header("authorization", "Bearer outage"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let verifier = SupabaseTokenVerifier::new(&server.uri(), "service-key").unwrap();

    assert!(verifier.verify("expired").await.unwrap().is_none());
    assert!(verifier.verify("phone-only").await.unwrap().is_none());
    assert!(verifier.verify("outage").await.is_err());
}

#[tokio::test]
async fn test_account_storage_failure_is_reported() {
    let mut users = MockUserRepo::new();
    users
        .expect_get_or_create()
        .returning(|_, _| Err(VolunteerError::StorageUnavailable(eyre::eyre!("pool exhausted"))));
    let server = build_server(
        Arc::new(InMemoryVolunteerRepository::new()),
        Arc::new(users),
        Uuid::new_v4(),
    );

    server
        .get("/api/auth/me")
        .add_header(AUTHORIZATION, bearer(ANA_TOKEN))
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_account_is_created_with_owner_role() {
    let owner_id = Uuid::new_v4();
    let mut users = MockUserRepo::new();
    users
        .expect_get_or_create()
        .withf(move |identity, role| identity.id == owner_id && *role == Role::Admin)
        .times(1)
        .returning(|identity, role| {
            let now = Utc::now();
            Ok(User {
                id: identity.id,
                name: identity.name.clone(),
                email: identity.email.clone(),
                role,
                created_at: now,
                updated_at: now,
                last_signed_in: now,
            })
        });
    let server = build_server(Arc::new(InMemoryVolunteerRepository::new()), Arc::new(users), owner_id);

    server
        .get("/api/volunteers")
        .add_header(AUTHORIZATION, bearer(ADMIN_TOKEN))
        .await
        .assert_status_ok();
}
