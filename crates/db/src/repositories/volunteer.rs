use async_trait::async_trait;
use eyre::Result;
use healtharmy_core::{
    errors::{VolunteerError, VolunteerResult},
    models::{
        availability::{AvailabilityInput, AvailabilitySlot},
        volunteer::{
            AvailabilityChange, NewVolunteer, Volunteer, VolunteerPatch, VolunteerUpdate,
            VolunteerWithAvailability,
        },
    },
    repository::VolunteerRepository,
};
use sqlx::{PgConnection, PgExecutor, Postgres, QueryBuilder};
use tracing::debug;

use super::storage_error;
use crate::{
    models::{DbAvailabilitySlot, DbVolunteer},
    DbPool,
};

const VOLUNTEER_COLUMNS: &str = "id, full_name, email, phone, specialization, professional_registration, \
     project, service_type, modality, session_duration, frequency, notes, address, status, created_at, updated_at";

pub async fn insert_volunteer(executor: impl PgExecutor<'_>, volunteer: &NewVolunteer) -> Result<i32> {
    let id = sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO volunteers (
            full_name, email, phone, specialization, professional_registration,
            project, service_type, modality, session_duration, frequency, notes, address
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING id
        "#,
    )
    .bind(&volunteer.full_name)
    .bind(&volunteer.email)
    .bind(&volunteer.phone)
    .bind(&volunteer.specialization)
    .bind(&volunteer.professional_registration)
    .bind(volunteer.project.as_str())
    .bind(volunteer.service_type.as_str())
    .bind(volunteer.modality.as_str())
    .bind(volunteer.session_duration)
    .bind(volunteer.frequency.as_str())
    .bind(&volunteer.notes)
    .bind(&volunteer.address)
    .fetch_one(executor)
    .await?;

    debug!(volunteer_id = id, "Inserted volunteer row");
    Ok(id)
}

/// Slots per `INSERT`. Each slot binds four parameters and PostgreSQL
/// accepts at most 65535 per statement.
pub const SLOT_BATCH_SIZE: usize = 1000;

/// Inserts all slots for the volunteer, [`SLOT_BATCH_SIZE`] rows per statement.
/// Run it inside a transaction when the set must land atomically.
pub async fn insert_availability(
    conn: &mut PgConnection,
    volunteer_id: i32,
    slots: &[AvailabilityInput],
) -> Result<()> {
    for batch in slots.chunks(SLOT_BATCH_SIZE) {
        let mut builder = QueryBuilder::<Postgres>::new(
            "INSERT INTO volunteer_availability (volunteer_id, day_of_week, start_time, end_time) ",
        );
        builder.push_values(batch, |mut row, slot| {
            row.push_bind(volunteer_id)
                .push_bind(slot.day_of_week)
                .push_bind(slot.start_time.as_str())
                .push_bind(slot.end_time.as_str());
        });
        builder.build().execute(&mut *conn).await?;
    }

    Ok(())
}

pub async fn delete_availability(executor: impl PgExecutor<'_>, volunteer_id: i32) -> Result<u64> {
    let result = sqlx::query("DELETE FROM volunteer_availability WHERE volunteer_id = $1")
        .bind(volunteer_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

pub async fn get_volunteer_by_id(executor: impl PgExecutor<'_>, id: i32) -> Result<Option<DbVolunteer>> {
    let volunteer = sqlx::query_as::<_, DbVolunteer>(&format!(
        "SELECT {VOLUNTEER_COLUMNS} FROM volunteers WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(volunteer)
}

pub async fn get_availability_by_volunteer_id(
    executor: impl PgExecutor<'_>,
    volunteer_id: i32,
) -> Result<Vec<DbAvailabilitySlot>> {
    let slots = sqlx::query_as::<_, DbAvailabilitySlot>(
        r#"
        SELECT id, volunteer_id, day_of_week, start_time, end_time, created_at, updated_at
        FROM volunteer_availability
        WHERE volunteer_id = $1
        ORDER BY day_of_week ASC, start_time ASC, id ASC
        "#,
    )
    .bind(volunteer_id)
    .fetch_all(executor)
    .await?;

    Ok(slots)
}

pub async fn list_volunteers(executor: impl PgExecutor<'_>) -> Result<Vec<DbVolunteer>> {
    let volunteers = sqlx::query_as::<_, DbVolunteer>(&format!(
        "SELECT {VOLUNTEER_COLUMNS} FROM volunteers ORDER BY id ASC"
    ))
    .fetch_all(executor)
    .await?;

    Ok(volunteers)
}

/// Overwrites the columns present in the patch and bumps `updated_at`.
/// Returns `false` when no volunteer has this id.
pub async fn update_volunteer_fields(
    executor: impl PgExecutor<'_>,
    id: i32,
    patch: &VolunteerPatch,
) -> Result<bool> {
    let mut builder = QueryBuilder::<Postgres>::new("UPDATE volunteers SET updated_at = NOW()");

    if let Some(full_name) = &patch.full_name {
        builder.push(", full_name = ").push_bind(full_name.as_str());
    }
    if let Some(email) = &patch.email {
        builder.push(", email = ").push_bind(email.as_str());
    }
    if let Some(phone) = &patch.phone {
        builder.push(", phone = ").push_bind(phone.as_str());
    }
    if let Some(specialization) = &patch.specialization {
        builder.push(", specialization = ").push_bind(specialization.as_str());
    }
    if let Some(registration) = &patch.professional_registration {
        builder.push(", professional_registration = ").push_bind(registration.as_str());
    }
    if let Some(project) = patch.project {
        builder.push(", project = ").push_bind(project.as_str());
    }
    if let Some(service_type) = patch.service_type {
        builder.push(", service_type = ").push_bind(service_type.as_str());
    }
    if let Some(modality) = patch.modality {
        builder.push(", modality = ").push_bind(modality.as_str());
    }
    if let Some(duration) = patch.session_duration {
        builder.push(", session_duration = ").push_bind(duration);
    }
    if let Some(frequency) = patch.frequency {
        builder.push(", frequency = ").push_bind(frequency.as_str());
    }
    if let Some(notes) = &patch.notes {
        builder.push(", notes = ").push_bind(notes.as_str());
    }
    if let Some(address) = &patch.address {
        builder.push(", address = ").push_bind(address.as_str());
    }
    if let Some(status) = patch.status {
        builder.push(", status = ").push_bind(status.as_str());
    }

    builder.push(" WHERE id = ").push_bind(id).push(" RETURNING id");

    let updated = builder
        .build_query_scalar::<i32>()
        .fetch_optional(executor)
        .await?;

    Ok(updated.is_some())
}

/// Deletes the volunteer; slots go with it through the cascade.
pub async fn delete_volunteer(executor: impl PgExecutor<'_>, id: i32) -> Result<u64> {
    let result = sqlx::query("DELETE FROM volunteers WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

/// [`VolunteerRepository`] over PostgreSQL. Multi-statement operations run
/// in one transaction.
#[derive(Clone)]
pub struct PgVolunteerRepository {
    pool: DbPool,
}

impl PgVolunteerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn sqlx_error(err: sqlx::Error) -> VolunteerError {
    storage_error(err.into())
}

#[async_trait]
impl VolunteerRepository for PgVolunteerRepository {
    async fn create(&self, volunteer: &NewVolunteer, slots: &[AvailabilityInput]) -> VolunteerResult<i32> {
        let mut tx = self.pool.begin().await.map_err(sqlx_error)?;

        let id = insert_volunteer(&mut *tx, volunteer).await.map_err(storage_error)?;
        insert_availability(&mut *tx, id, slots).await.map_err(storage_error)?;

        tx.commit().await.map_err(sqlx_error)?;
        Ok(id)
    }

    async fn get_by_id(&self, id: i32) -> VolunteerResult<Option<VolunteerWithAvailability>> {
        // Both reads share one snapshot so a concurrent replace is seen whole or not at all.
        let mut tx = self.pool.begin().await.map_err(sqlx_error)?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(sqlx_error)?;

        let Some(row) = get_volunteer_by_id(&mut *tx, id).await.map_err(storage_error)? else {
            return Ok(None);
        };

        let availability = get_availability_by_volunteer_id(&mut *tx, id)
            .await
            .map_err(storage_error)?
            .into_iter()
            .map(AvailabilitySlot::from)
            .collect();
        tx.commit().await.map_err(sqlx_error)?;

        Ok(Some(VolunteerWithAvailability {
            volunteer: Volunteer::try_from(row)?,
            availability,
        }))
    }

    async fn list(&self) -> VolunteerResult<Vec<Volunteer>> {
        list_volunteers(&self.pool)
            .await
            .map_err(storage_error)?
            .into_iter()
            .map(Volunteer::try_from)
            .collect()
    }

    async fn update(&self, id: i32, update: &VolunteerUpdate) -> VolunteerResult<()> {
        let mut tx = self.pool.begin().await.map_err(sqlx_error)?;

        let found = update_volunteer_fields(&mut *tx, id, &update.fields)
            .await
            .map_err(storage_error)?;
        if !found {
            return Err(VolunteerError::NotFound(format!("volunteer {id}")));
        }

        if let AvailabilityChange::Replace(slots) = &update.availability {
            let removed = delete_availability(&mut *tx, id).await.map_err(storage_error)?;
            insert_availability(&mut *tx, id, slots).await.map_err(storage_error)?;
            debug!(volunteer_id = id, removed, inserted = slots.len(), "Replaced availability");
        }

        tx.commit().await.map_err(sqlx_error)?;
        Ok(())
    }

    async fn delete(&self, id: i32) -> VolunteerResult<()> {
        let removed = delete_volunteer(&self.pool, id).await.map_err(storage_error)?;
        debug!(volunteer_id = id, removed, "Deleted volunteer");
        Ok(())
    }
}
