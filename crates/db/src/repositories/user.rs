use async_trait::async_trait;
use eyre::Result;
use healtharmy_core::{
    errors::VolunteerResult,
    models::principal::{ExternalIdentity, Role, User},
    repository::UserRepository,
};
use sqlx::PgExecutor;

use super::storage_error;
use crate::{models::DbUser, DbPool};

/// Inserts the account on first sign-in. On later sign-ins only
/// `last_signed_in` moves; the stored role and profile are kept.
pub async fn upsert_user(
    executor: impl PgExecutor<'_>,
    identity: &ExternalIdentity,
    role_on_create: Role,
) -> Result<DbUser> {
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        INSERT INTO users (id, name, email, role)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (id) DO UPDATE
        SET last_signed_in = NOW(), updated_at = NOW()
        RETURNING id, name, email, role, created_at, updated_at, last_signed_in
        "#,
    )
    .bind(identity.id)
    .bind(&identity.name)
    .bind(&identity.email)
    .bind(role_on_create.as_str())
    .fetch_one(executor)
    .await?;

    Ok(user)
}

#[derive(Clone)]
pub struct PgUserRepository {
    pool: DbPool,
}

impl PgUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn get_or_create(&self, identity: &ExternalIdentity, role_on_create: Role) -> VolunteerResult<User> {
        let row = upsert_user(&self.pool, identity, role_on_create)
            .await
            .map_err(storage_error)?;
        User::try_from(row)
    }
}
