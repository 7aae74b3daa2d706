use chrono::{DateTime, Utc};
use healtharmy_core::{
    errors::VolunteerError,
    models::{
        availability::AvailabilitySlot,
        principal::User,
        volunteer::Volunteer,
    },
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Row of `volunteers`. Enumerated columns are stored as their wire strings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbVolunteer {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub specialization: String,
    pub professional_registration: String,
    pub project: String,
    pub service_type: String,
    pub modality: String,
    pub session_duration: i32,
    pub frequency: String,
    pub notes: Option<String>,
    pub address: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAvailabilitySlot {
    pub id: i32,
    pub volunteer_id: i32,
    pub day_of_week: i32,
    pub start_time: String,
    pub end_time: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_signed_in: DateTime<Utc>,
}

fn corrupt(err: impl std::error::Error + Send + Sync + 'static) -> VolunteerError {
    VolunteerError::Internal(Box::new(err))
}

impl TryFrom<DbVolunteer> for Volunteer {
    type Error = VolunteerError;

    fn try_from(row: DbVolunteer) -> Result<Self, Self::Error> {
        Ok(Volunteer {
            id: row.id,
            full_name: row.full_name,
            email: row.email,
            phone: row.phone,
            specialization: row.specialization,
            professional_registration: row.professional_registration,
            project: row.project.parse().map_err(corrupt)?,
            service_type: row.service_type.parse().map_err(corrupt)?,
            modality: row.modality.parse().map_err(corrupt)?,
            session_duration: row.session_duration,
            frequency: row.frequency.parse().map_err(corrupt)?,
            notes: row.notes,
            address: row.address,
            status: row.status.parse().map_err(corrupt)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl From<DbAvailabilitySlot> for AvailabilitySlot {
    fn from(row: DbAvailabilitySlot) -> Self {
        AvailabilitySlot {
            id: row.id,
            volunteer_id: row.volunteer_id,
            day_of_week: row.day_of_week,
            start_time: row.start_time,
            end_time: row.end_time,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl TryFrom<DbUser> for User {
    type Error = VolunteerError;

    fn try_from(row: DbUser) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            role: row.role.parse().map_err(corrupt)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
            last_signed_in: row.last_signed_in,
        })
    }
}
