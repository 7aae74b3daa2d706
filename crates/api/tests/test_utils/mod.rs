use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::HeaderValue;
use axum_test::TestServer;
use healtharmy_api::{app, middleware::auth::TokenVerifier, ApiState};
use healtharmy_core::{
    models::principal::ExternalIdentity,
    notify::{NotificationSink, RegistrationNotice},
    repository::{UserRepository, VolunteerRepository},
    service::VolunteerService,
};
use healtharmy_db::mock::memory::{InMemoryUserRepository, InMemoryVolunteerRepository};
use serde_json::{json, Value};
use uuid::Uuid;

pub const ADMIN_TOKEN: &str = "admin-token";
pub const ANA_TOKEN: &str = "ana-token";
pub const BIA_TOKEN: &str = "bia-token";
/// Makes the verifier fail as if the identity provider were down.
pub const BROKEN_TOKEN: &str = "broken-token";

/// Accepts a fixed set of tokens.
pub struct StaticVerifier {
    identities: HashMap<&'static str, ExternalIdentity>,
}

#[async_trait]
impl TokenVerifier for StaticVerifier {
    async fn verify(&self, token: &str) -> eyre::Result<Option<ExternalIdentity>> {
        if token == BROKEN_TOKEN {
            eyre::bail!("identity provider timed out");
        }
        Ok(self.identities.get(token).cloned())
    }
}

struct SilentSink;

#[async_trait]
impl NotificationSink for SilentSink {
    async fn notify_volunteer(&self, _notice: &RegistrationNotice) -> eyre::Result<()> {
        Ok(())
    }

    async fn notify_admin(&self, _notice: &RegistrationNotice) -> eyre::Result<()> {
        Ok(())
    }
}

pub struct TestContext {
    pub server: TestServer,
    pub volunteers: Arc<InMemoryVolunteerRepository>,
    pub owner_id: Uuid,
}

impl TestContext {
    pub fn new() -> Self {
        let owner_id = Uuid::new_v4();
        let volunteers = Arc::new(InMemoryVolunteerRepository::new());
        let server = build_server(
            volunteers.clone(),
            Arc::new(InMemoryUserRepository::new()),
            owner_id,
        );

        Self {
            server,
            volunteers,
            owner_id,
        }
    }
}

/// Serves the router over the given repositories with the static tokens.
pub fn build_server(
    volunteers: Arc<dyn VolunteerRepository>,
    users: Arc<dyn UserRepository>,
    owner_id: Uuid,
) -> TestServer {
    let identity = |id: Uuid, email: &str, name: &str| ExternalIdentity {
        id,
        email: email.to_string(),
        name: Some(name.to_string()),
    };

    let identities = HashMap::from([
        (ADMIN_TOKEN, identity(owner_id, "admin@healtharmy.com", "Admin")),
        (ANA_TOKEN, identity(Uuid::new_v4(), "ana@x.com", "Ana")),
        (BIA_TOKEN, identity(Uuid::new_v4(), "bia@x.com", "Bia")),
    ]);

    let state = Arc::new(ApiState {
        volunteers: VolunteerService::new(volunteers, Arc::new(SilentSink)),
        users,
        verifier: Arc::new(StaticVerifier { identities }),
        owner_id: Some(owner_id),
    });

    TestServer::new(app(state)).expect("Failed to start test server")
}

pub fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {token}")).expect("valid header value")
}

/// A valid registration payload as the web form sends it.
pub fn registration(full_name: &str, email: &str) -> Value {
    json!({
        "fullName": full_name,
        "email": email,
        "phone": "11999999999",
        "specialization": "Psicologia",
        "professionalRegistration": "CRP 06/123456",
        "project": "borahae_terapias",
        "serviceType": "gratuito",
        "modality": "online",
        "frequency": "semanal",
        "availability": [
            { "dayOfWeek": 1, "startTime": "09:00", "endTime": "10:00" }
        ]
    })
}
