//! # Volunteer Service
//!
//! Orchestrates the volunteer lifecycle over a [`VolunteerRepository`]:
//! the authorization policy is evaluated first, input is validated next, and
//! only then is storage touched. After a registration commits, confirmation
//! and admin-alert messages are dispatched on a detached task so their
//! outcome never reaches the caller.

use std::sync::Arc;

use tracing::{debug, info, warn};
use validator::Validate;

use crate::{
    errors::{VolunteerError, VolunteerResult},
    models::{
        principal::Principal,
        volunteer::{
            AvailabilityChange, CreateVolunteerRequest, CreateVolunteerResponse, MutationResponse, UpdateVolunteerData,
            Volunteer, VolunteerIdInput, VolunteerUpdate, VolunteerWithAvailability,
        },
    },
    notify::{NotificationSink, RegistrationNotice},
    policy::{authorize, Operation},
    repository::VolunteerRepository,
};

pub const CREATED_MESSAGE: &str = "Voluntário cadastrado com sucesso!";
pub const UPDATED_MESSAGE: &str = "Voluntário atualizado com sucesso!";
pub const DELETED_MESSAGE: &str = "Voluntário removido com sucesso!";

#[derive(Clone)]
pub struct VolunteerService {
    repository: Arc<dyn VolunteerRepository>,
    notifier: Arc<dyn NotificationSink>,
}

impl VolunteerService {
    pub fn new(repository: Arc<dyn VolunteerRepository>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    /// Registers a volunteer with status `pendente` and returns its id.
    ///
    /// Open to every principal. Notifications are sent in the background
    /// once the volunteer and its slots are stored.
    pub async fn register_volunteer(
        &self,
        principal: &Principal,
        input: CreateVolunteerRequest,
    ) -> VolunteerResult<CreateVolunteerResponse> {
        enforce(principal, Operation::Register, None)?;
        input.validate()?;

        let (volunteer, slots) = input.into_parts();
        let id = self.repository.create(&volunteer, &slots).await?;
        info!(volunteer_id = id, slots = slots.len(), "Volunteer registered");

        self.dispatch_notifications(RegistrationNotice::new(id, &volunteer));

        Ok(CreateVolunteerResponse {
            id,
            message: CREATED_MESSAGE.to_string(),
        })
    }

    /// Returns the volunteer with its availability.
    ///
    /// Admins get `None` for an unknown id. Anyone else is denied unless the
    /// record exists and carries their own email.
    pub async fn get_volunteer(
        &self,
        id: i32,
        principal: &Principal,
    ) -> VolunteerResult<Option<VolunteerWithAvailability>> {
        if !principal.is_authenticated() {
            return Err(denied(principal, Operation::View));
        }
        validate_id(id)?;

        let record = self.repository.get_by_id(id).await?;
        let owner = record.as_ref().map(|found| found.volunteer.email.as_str());
        enforce(principal, Operation::View, owner)?;

        Ok(record)
    }

    pub async fn list_volunteers(&self, principal: &Principal) -> VolunteerResult<Vec<Volunteer>> {
        enforce(principal, Operation::List, None)?;
        self.repository.list().await
    }

    /// Applies an administrator update. A present `availability` array,
    /// including an empty one, replaces the stored slots.
    pub async fn update_volunteer(
        &self,
        id: i32,
        data: UpdateVolunteerData,
        principal: &Principal,
    ) -> VolunteerResult<MutationResponse> {
        enforce(principal, Operation::Update, None)?;
        validate_id(id)?;
        data.validate()?;

        let update = VolunteerUpdate::from(data);
        self.repository.update(id, &update).await?;
        debug!(
            volunteer_id = id,
            replaced_availability = matches!(update.availability, AvailabilityChange::Replace(_)),
            "Volunteer updated"
        );

        Ok(MutationResponse::ok(UPDATED_MESSAGE))
    }

    /// Deletes the volunteer. Deleting an unknown id succeeds.
    pub async fn delete_volunteer(&self, id: i32, principal: &Principal) -> VolunteerResult<MutationResponse> {
        enforce(principal, Operation::Delete, None)?;
        validate_id(id)?;

        self.repository.delete(id).await?;
        info!(volunteer_id = id, "Volunteer deleted");

        Ok(MutationResponse::ok(DELETED_MESSAGE))
    }

    fn dispatch_notifications(&self, notice: RegistrationNotice) {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            if let Err(err) = notifier.notify_volunteer(&notice).await {
                warn!(volunteer_id = notice.volunteer_id, error = %err, "Failed to send confirmation email");
            }
            if let Err(err) = notifier.notify_admin(&notice).await {
                warn!(volunteer_id = notice.volunteer_id, error = %err, "Failed to send admin notification");
            }
        });
    }
}

fn enforce(principal: &Principal, operation: Operation, owner_email: Option<&str>) -> VolunteerResult<()> {
    if authorize(principal, operation, owner_email).is_allowed() {
        Ok(())
    } else {
        Err(denied(principal, operation))
    }
}

fn denied(principal: &Principal, operation: Operation) -> VolunteerError {
    if principal.is_authenticated() {
        VolunteerError::AccessDenied(format!("{operation:?} is not permitted for this user"))
    } else {
        VolunteerError::Unauthenticated(format!("{operation:?} requires a signed-in user"))
    }
}

fn validate_id(id: i32) -> VolunteerResult<()> {
    VolunteerIdInput { id }.validate()?;
    Ok(())
}
