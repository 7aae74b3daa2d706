//! Storage ports. `healtharmy-db` provides the PostgreSQL and in-memory
//! implementations.

use async_trait::async_trait;

use crate::{
    errors::VolunteerResult,
    models::{
        availability::AvailabilityInput,
        principal::{ExternalIdentity, Role, User},
        volunteer::{NewVolunteer, Volunteer, VolunteerUpdate, VolunteerWithAvailability},
    },
};

/// Persistence of volunteers and the slots they own.
///
/// Every method is a single storage round trip with no retries. Failures to
/// reach storage surface as `StorageUnavailable`.
#[async_trait]
pub trait VolunteerRepository: Send + Sync {
    /// Inserts the volunteer and then its slots under the generated id, in
    /// one transaction.
    async fn create(&self, volunteer: &NewVolunteer, slots: &[AvailabilityInput]) -> VolunteerResult<i32>;

    /// `Ok(None)` when no volunteer has this id.
    async fn get_by_id(&self, id: i32) -> VolunteerResult<Option<VolunteerWithAvailability>>;

    /// All volunteers, without availability.
    async fn list(&self) -> VolunteerResult<Vec<Volunteer>>;

    /// Applies the patch, always bumping `updated_at`, and replaces the slot
    /// set when asked, in one transaction. `NotFound` when the id is unknown.
    async fn update(&self, id: i32, update: &VolunteerUpdate) -> VolunteerResult<()>;

    /// Removes the volunteer and, by cascade, its slots. Unknown ids are not
    /// an error.
    async fn delete(&self, id: i32) -> VolunteerResult<()>;
}

/// Local accounts backing authenticated principals.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Returns the account for this identity, creating it with
    /// `role_on_create` on first sight. Existing accounts only get their
    /// sign-in time refreshed.
    async fn get_or_create(&self, identity: &ExternalIdentity, role_on_create: Role) -> VolunteerResult<User>;
}
