use async_trait::async_trait;
use healtharmy_core::{
    errors::VolunteerResult,
    models::{
        availability::AvailabilityInput,
        principal::{ExternalIdentity, Role, User},
        volunteer::{NewVolunteer, Volunteer, VolunteerUpdate, VolunteerWithAvailability},
    },
    repository::{UserRepository, VolunteerRepository},
};
use mockall::mock;

// Mock repositories for testing
mock! {
    pub VolunteerRepo {}

    #[async_trait]
    impl VolunteerRepository for VolunteerRepo {
        async fn create(
            &self,
            volunteer: &NewVolunteer,
            slots: &[AvailabilityInput],
        ) -> VolunteerResult<i32>;

        async fn get_by_id(
            &self,
            id: i32,
        ) -> VolunteerResult<Option<VolunteerWithAvailability>>;

        async fn list(&self) -> VolunteerResult<Vec<Volunteer>>;

        async fn update(
            &self,
            id: i32,
            update: &VolunteerUpdate,
        ) -> VolunteerResult<()>;

        async fn delete(&self, id: i32) -> VolunteerResult<()>;
    }
}

mock! {
    pub UserRepo {}

    #[async_trait]
    impl UserRepository for UserRepo {
        async fn get_or_create(
            &self,
            identity: &ExternalIdentity,
            role_on_create: Role,
        ) -> VolunteerResult<User>;
    }
}
