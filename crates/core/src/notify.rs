use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::volunteer::{NewVolunteer, Project};

/// What the notification messages say about a new registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationNotice {
    pub volunteer_id: i32,
    pub full_name: String,
    pub email: String,
    pub specialization: String,
    pub project: Project,
}

impl RegistrationNotice {
    pub fn new(volunteer_id: i32, volunteer: &NewVolunteer) -> Self {
        Self {
            volunteer_id,
            full_name: volunteer.full_name.clone(),
            email: volunteer.email.clone(),
            specialization: volunteer.specialization.clone(),
            project: volunteer.project,
        }
    }
}

/// Outbound messages about registrations. Callers treat failures as
/// loggable only.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Confirmation to the volunteer who registered.
    async fn notify_volunteer(&self, notice: &RegistrationNotice) -> eyre::Result<()>;

    /// Alert to the configured administrator address.
    async fn notify_admin(&self, notice: &RegistrationNotice) -> eyre::Result<()>;
}
