//! # Authentication Module
//!
//! Resolves the [`Principal`] behind a request. A bearer token is checked
//! against the identity provider; a verified identity is matched to a local
//! account, which is created on first sight. Requests without a usable token
//! are anonymous.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use eyre::{eyre, Result, WrapErr};
use healtharmy_core::{
    errors::VolunteerResult,
    models::principal::{ExternalIdentity, Principal, Role},
};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

/// Checks bearer tokens with the identity provider.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// `Ok(None)` when the provider does not recognize the token.
    async fn verify(&self, token: &str) -> Result<Option<ExternalIdentity>>;
}

/// Verifies tokens with Supabase Auth (`GET /auth/v1/user`).
pub struct SupabaseTokenVerifier {
    client: reqwest::Client,
    user_endpoint: String,
    service_key: String,
}

#[derive(Debug, Deserialize)]
struct SupabaseUser {
    id: Uuid,
    email: Option<String>,
    #[serde(default)]
    user_metadata: SupabaseMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct SupabaseMetadata {
    name: Option<String>,
}

impl SupabaseTokenVerifier {
    pub fn new(supabase_url: &str, service_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .wrap_err("Failed to build identity provider client")?;

        Ok(Self {
            client,
            user_endpoint: format!("{}/auth/v1/user", supabase_url.trim_end_matches('/')),
            service_key: service_key.into(),
        })
    }
}

#[async_trait]
impl TokenVerifier for SupabaseTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Option<ExternalIdentity>> {
        let response = self
            .client
            .get(&self.user_endpoint)
            .header("apikey", &self.service_key)
            .bearer_auth(token)
            .send()
            .await
            .wrap_err("Failed to reach identity provider")?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            debug!(%status, "Identity provider rejected token");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(eyre!("Identity provider answered {status}"));
        }

        let user: SupabaseUser = response
            .json()
            .await
            .wrap_err("Unexpected identity provider response")?;

        let Some(email) = user.email else {
            debug!(user_id = %user.id, "Verified identity has no email");
            return Ok(None);
        };

        Ok(Some(ExternalIdentity {
            id: user.id,
            email,
            name: user.user_metadata.name,
        }))
    }
}

/// The token of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Turns request headers into a principal.
///
/// Verification failures degrade to anonymous. Failing to load or create the
/// local account is an error.
pub async fn resolve_principal(state: &ApiState, headers: &HeaderMap) -> VolunteerResult<Principal> {
    let Some(token) = bearer_token(headers) else {
        return Ok(Principal::Anonymous);
    };

    let identity = match state.verifier.verify(token).await {
        Ok(Some(identity)) => identity,
        Ok(None) => return Ok(Principal::Anonymous),
        Err(err) => {
            warn!(error = %err, "Token verification failed; treating request as anonymous");
            return Ok(Principal::Anonymous);
        }
    };

    let role = if state.owner_id == Some(identity.id) {
        Role::Admin
    } else {
        Role::User
    };
    let user = state.users.get_or_create(&identity, role).await?;

    Ok(Principal::User(user))
}

/// Extractor for the principal of the current request.
#[derive(Debug, Clone)]
pub struct CurrentPrincipal(pub Principal);

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for CurrentPrincipal {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<ApiState>) -> Result<Self, Self::Rejection> {
        let principal = resolve_principal(state, &parts.headers).await?;
        Ok(CurrentPrincipal(principal))
    }
}
