use std::sync::Arc;

use axum::http::{header::AUTHORIZATION, StatusCode};
use healtharmy_core::{
    errors::VolunteerError,
    service::{CREATED_MESSAGE, DELETED_MESSAGE, UPDATED_MESSAGE},
};
use healtharmy_db::mock::{memory::InMemoryUserRepository, repositories::MockVolunteerRepo};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::test_utils::{bearer, build_server, registration, TestContext, ADMIN_TOKEN, ANA_TOKEN, BIA_TOKEN};

async fn register(ctx: &TestContext, full_name: &str, email: &str) -> i64 {
    let response = ctx
        .server
        .post("/api/volunteers")
        .json(&registration(full_name, email))
        .await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["message"], CREATED_MESSAGE);
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_anonymous_registration() {
    let ctx = TestContext::new();
    let id = register(&ctx, "Ana", "ana@x.com").await;
    assert!(id > 0);
}

#[tokio::test]
async fn test_registration_reports_field_errors() {
    let ctx = TestContext::new();
    let mut payload = registration("", "email-invalido");
    payload["availability"][0]["startTime"] = json!("9:00");
    payload["availability"][0]["dayOfWeek"] = json!(7);

    let response = ctx.server.post("/api/volunteers").json(&payload).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["fields"]["email"], json!(["Email inválido"]));
    assert_eq!(body["fields"]["full_name"], json!(["Nome completo é obrigatório"]));
    assert_eq!(
        body["fields"]["availability[0].start_time"],
        json!(["Formato de hora inválido (HH:mm)"])
    );
    assert!(body["fields"]["availability[0].day_of_week"].is_array());
    assert_eq!(ctx.volunteers.slot_count().await, 0);
}

#[tokio::test]
async fn test_registration_requires_availability() {
    let ctx = TestContext::new();
    let mut payload = registration("Ana", "ana@x.com");
    payload.as_object_mut().unwrap().remove("availability");

    let response = ctx.server.post("/api/volunteers").json(&payload).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["fields"]["availability"], json!(["Disponibilidade é obrigatória"]));

    let listed = ctx
        .server
        .get("/api/volunteers")
        .add_header(AUTHORIZATION, bearer(ADMIN_TOKEN))
        .await;
    assert_eq!(listed.json::<Value>(), json!([]));
}

#[tokio::test]
async fn test_registration_rejects_unknown_enum_value() {
    let ctx = TestContext::new();
    let mut payload = registration("Ana", "ana@x.com");
    payload["frequency"] = json!("mensal");

    let response = ctx.server.post("/api/volunteers").json(&payload).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["fields"]["body"].is_array());
}

#[tokio::test]
async fn test_list_requires_admin() {
    let ctx = TestContext::new();
    register(&ctx, "Ana", "ana@x.com").await;

    ctx.server
        .get("/api/volunteers")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    ctx.server
        .get("/api/volunteers")
        .add_header(AUTHORIZATION, bearer(ANA_TOKEN))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let response = ctx
        .server
        .get("/api/volunteers")
        .add_header(AUTHORIZATION, bearer(ADMIN_TOKEN))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["email"], "ana@x.com");
    assert!(body[0].get("availability").is_none());
}

#[tokio::test]
async fn test_get_visibility() {
    let ctx = TestContext::new();
    let id = register(&ctx, "Ana", "ana@x.com").await;
    let path = format!("/api/volunteers/{id}");

    let own = ctx.server.get(&path).add_header(AUTHORIZATION, bearer(ANA_TOKEN)).await;
    own.assert_status_ok();
    let body: Value = own.json();
    assert_eq!(body["fullName"], "Ana");
    assert_eq!(body["status"], "pendente");
    assert_eq!(body["availability"][0]["dayOfWeek"], 1);

    ctx.server
        .get(&path)
        .add_header(AUTHORIZATION, bearer(BIA_TOKEN))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    ctx.server.get(&path).await.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_get_unknown_id() {
    let ctx = TestContext::new();

    let as_admin = ctx
        .server
        .get("/api/volunteers/999999")
        .add_header(AUTHORIZATION, bearer(ADMIN_TOKEN))
        .await;
    as_admin.assert_status_ok();
    assert_eq!(as_admin.json::<Value>(), Value::Null);

    ctx.server
        .get("/api/volunteers/999999")
        .add_header(AUTHORIZATION, bearer(ANA_TOKEN))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_mutations_require_admin() {
    let ctx = TestContext::new();
    let id = register(&ctx, "Ana", "ana@x.com").await;
    let path = format!("/api/volunteers/{id}");

    ctx.server
        .put(&path)
        .add_header(AUTHORIZATION, bearer(ANA_TOKEN))
        .json(&json!({ "status": "ativo" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);
    ctx.server
        .delete(&path)
        .add_header(AUTHORIZATION, bearer(ANA_TOKEN))
        .await
        .assert_status(StatusCode::FORBIDDEN);
    ctx.server
        .delete(&path)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let still_there = ctx.server.get(&path).add_header(AUTHORIZATION, bearer(ADMIN_TOKEN)).await;
    assert_eq!(still_there.json::<Value>()["status"], "pendente");
}

#[tokio::test]
async fn test_update_errors() {
    let ctx = TestContext::new();

    ctx.server
        .put("/api/volunteers/4242")
        .add_header(AUTHORIZATION, bearer(ADMIN_TOKEN))
        .json(&json!({ "status": "ativo" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let invalid_id = ctx
        .server
        .put("/api/volunteers/0")
        .add_header(AUTHORIZATION, bearer(ADMIN_TOKEN))
        .json(&json!({}))
        .await;
    invalid_id.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(invalid_id.json::<Value>()["fields"]["id"], json!(["ID inválido"]));
}

#[tokio::test]
async fn test_malformed_id_segment_is_a_field_error() {
    let ctx = TestContext::new();

    let get = ctx
        .server
        .get("/api/volunteers/abc")
        .add_header(AUTHORIZATION, bearer(ADMIN_TOKEN))
        .await;
    get.assert_status(StatusCode::BAD_REQUEST);
    assert!(get.json::<Value>()["fields"]["id"].is_array());

    let overflow = ctx
        .server
        .delete("/api/volunteers/99999999999")
        .add_header(AUTHORIZATION, bearer(ADMIN_TOKEN))
        .await;
    overflow.assert_status(StatusCode::BAD_REQUEST);
    assert!(overflow.json::<Value>()["fields"]["id"].is_array());

    let update = ctx
        .server
        .put("/api/volunteers/1.5")
        .add_header(AUTHORIZATION, bearer(ADMIN_TOKEN))
        .json(&json!({ "status": "ativo" }))
        .await;
    update.assert_status(StatusCode::BAD_REQUEST);
    assert!(update.json::<Value>()["fields"]["id"].is_array());
}

#[tokio::test]
async fn test_storage_outage_is_service_unavailable() {
    let ctx = TestContext::new();
    ctx.volunteers.set_unavailable(true);

    let response = ctx
        .server
        .post("/api/volunteers")
        .json(&registration("Ana", "ana@x.com"))
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert!(response.json::<Value>()["error"]
        .as_str()
        .unwrap()
        .starts_with("Storage unavailable"));
}

#[test_log::test(tokio::test)]
async fn test_registration_lifecycle_over_http() {
    let ctx = TestContext::new();
    let id = register(&ctx, "Ana", "ana@x.com").await;
    let path = format!("/api/volunteers/{id}");
    let admin = || bearer(ADMIN_TOKEN);

    let record: Value = ctx.server.get(&path).add_header(AUTHORIZATION, admin()).await.json();
    assert_eq!(record["fullName"], "Ana");
    assert_eq!(
        record["availability"],
        json!([{
            "id": record["availability"][0]["id"],
            "volunteerId": id,
            "dayOfWeek": 1,
            "startTime": "09:00",
            "endTime": "10:00",
            "createdAt": record["availability"][0]["createdAt"],
            "updatedAt": record["availability"][0]["updatedAt"],
        }])
    );

    let updated = ctx
        .server
        .put(&path)
        .add_header(AUTHORIZATION, admin())
        .json(&json!({ "status": "ativo" }))
        .await;
    updated.assert_status_ok();
    assert_eq!(updated.json::<Value>(), json!({ "success": true, "message": UPDATED_MESSAGE }));

    let record: Value = ctx.server.get(&path).add_header(AUTHORIZATION, admin()).await.json();
    assert_eq!(record["status"], "ativo");
    assert_eq!(record["availability"].as_array().unwrap().len(), 1);

    ctx.server
        .put(&path)
        .add_header(AUTHORIZATION, admin())
        .json(&json!({ "availability": [] }))
        .await
        .assert_status_ok();
    let record: Value = ctx.server.get(&path).add_header(AUTHORIZATION, admin()).await.json();
    assert_eq!(record["availability"], json!([]));

    let deleted = ctx.server.delete(&path).add_header(AUTHORIZATION, admin()).await;
    assert_eq!(deleted.json::<Value>()["message"], DELETED_MESSAGE);
    ctx.server
        .delete(&path)
        .add_header(AUTHORIZATION, admin())
        .await
        .assert_status_ok();

    let gone = ctx.server.get(&path).add_header(AUTHORIZATION, admin()).await;
    assert_eq!(gone.json::<Value>(), Value::Null);
}

#[tokio::test]
async fn test_storage_rejections_map_to_conflict_and_internal() {
    let mut repo = MockVolunteerRepo::new();
    repo.expect_create()
        .returning(|_, _| Err(VolunteerError::ConstraintViolation("day_of_week out of range".into())));
    repo.expect_list()
        .returning(|| Err(VolunteerError::Internal("unknown status value".into())));
    let server = build_server(Arc::new(repo), Arc::new(InMemoryUserRepository::new()), Uuid::new_v4());

    server
        .post("/api/volunteers")
        .json(&registration("Ana", "ana@x.com"))
        .await
        .assert_status(StatusCode::CONFLICT);

    server
        .get("/api/volunteers")
        .add_header(AUTHORIZATION, bearer(ADMIN_TOKEN))
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}
