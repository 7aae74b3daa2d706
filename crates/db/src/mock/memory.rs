//! In-process repositories with the same observable behavior as the
//! PostgreSQL ones, for tests and local runs without a database.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use healtharmy_core::{
    errors::{VolunteerError, VolunteerResult},
    models::{
        availability::{AvailabilityInput, AvailabilitySlot},
        principal::{ExternalIdentity, Role, User},
        volunteer::{AvailabilityChange, NewVolunteer, Volunteer, VolunteerPatch, VolunteerStatus, VolunteerUpdate, VolunteerWithAvailability},
    },
    repository::{UserRepository, VolunteerRepository},
};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    last_volunteer_id: i32,
    last_slot_id: i32,
    volunteers: BTreeMap<i32, Volunteer>,
    slots: Vec<AvailabilitySlot>,
}

impl Tables {
    fn insert_slots(&mut self, volunteer_id: i32, slots: &[AvailabilityInput]) {
        let now = Utc::now();
        for slot in slots {
            self.last_slot_id += 1;
            self.slots.push(AvailabilitySlot {
                id: self.last_slot_id,
                volunteer_id,
                day_of_week: slot.day_of_week,
                start_time: slot.start_time.clone(),
                end_time: slot.end_time.clone(),
                created_at: now,
                updated_at: now,
            });
        }
    }
}

/// Mirrors the `CHECK (day_of_week BETWEEN 0 AND 6)` column constraint.
fn check_slots(slots: &[AvailabilityInput]) -> VolunteerResult<()> {
    match slots.iter().find(|slot| !(0..=6).contains(&slot.day_of_week)) {
        Some(slot) => Err(VolunteerError::ConstraintViolation(format!(
            "day_of_week {} is outside 0-6",
            slot.day_of_week
        ))),
        None => Ok(()),
    }
}

fn apply_patch(volunteer: &mut Volunteer, patch: &VolunteerPatch) {
    if let Some(value) = &patch.full_name {
        volunteer.full_name = value.clone();
    }
    if let Some(value) = &patch.email {
        volunteer.email = value.clone();
    }
    if let Some(value) = &patch.phone {
        volunteer.phone = value.clone();
    }
    if let Some(value) = &patch.specialization {
        volunteer.specialization = value.clone();
    }
    if let Some(value) = &patch.professional_registration {
        volunteer.professional_registration = value.clone();
    }
    if let Some(value) = patch.project {
        volunteer.project = value;
    }
    if let Some(value) = patch.service_type {
        volunteer.service_type = value;
    }
    if let Some(value) = patch.modality {
        volunteer.modality = value;
    }
    if let Some(value) = patch.session_duration {
        volunteer.session_duration = value;
    }
    if let Some(value) = patch.frequency {
        volunteer.frequency = value;
    }
    if let Some(value) = &patch.notes {
        volunteer.notes = Some(value.clone());
    }
    if let Some(value) = &patch.address {
        volunteer.address = Some(value.clone());
    }
    if let Some(value) = patch.status {
        volunteer.status = value;
    }
}

#[derive(Default)]
pub struct InMemoryVolunteerRepository {
    tables: RwLock<Tables>,
    unavailable: AtomicBool,
}

impl InMemoryVolunteerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every call fails with `StorageUnavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored slots across all volunteers.
    pub async fn slot_count(&self) -> usize {
        self.tables.read().await.slots.len()
    }

    fn ensure_available(&self) -> VolunteerResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(VolunteerError::StorageUnavailable(eyre::eyre!(
                "in-memory store marked unavailable"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl VolunteerRepository for InMemoryVolunteerRepository {
    async fn create(&self, volunteer: &NewVolunteer, slots: &[AvailabilityInput]) -> VolunteerResult<i32> {
        self.ensure_available()?;
        check_slots(slots)?;

        let mut tables = self.tables.write().await;
        tables.last_volunteer_id += 1;
        let id = tables.last_volunteer_id;
        let now = Utc::now();

        tables.volunteers.insert(
            id,
            Volunteer {
                id,
                full_name: volunteer.full_name.clone(),
                email: volunteer.email.clone(),
                phone: volunteer.phone.clone(),
                specialization: volunteer.specialization.clone(),
                professional_registration: volunteer.professional_registration.clone(),
                project: volunteer.project,
                service_type: volunteer.service_type,
                modality: volunteer.modality,
                session_duration: volunteer.session_duration,
                frequency: volunteer.frequency,
                notes: volunteer.notes.clone(),
                address: volunteer.address.clone(),
                status: VolunteerStatus::default(),
                created_at: now,
                updated_at: now,
            },
        );
        tables.insert_slots(id, slots);

        Ok(id)
    }

    async fn get_by_id(&self, id: i32) -> VolunteerResult<Option<VolunteerWithAvailability>> {
        self.ensure_available()?;

        let tables = self.tables.read().await;
        let Some(volunteer) = tables.volunteers.get(&id) else {
            return Ok(None);
        };

        let mut availability: Vec<AvailabilitySlot> = tables
            .slots
            .iter()
            .filter(|slot| slot.volunteer_id == id)
            .cloned()
            .collect();
        availability.sort_by(|a, b| {
            (a.day_of_week, &a.start_time, a.id).cmp(&(b.day_of_week, &b.start_time, b.id))
        });

        Ok(Some(VolunteerWithAvailability {
            volunteer: volunteer.clone(),
            availability,
        }))
    }

    async fn list(&self) -> VolunteerResult<Vec<Volunteer>> {
        self.ensure_available()?;
        Ok(self.tables.read().await.volunteers.values().cloned().collect())
    }

    async fn update(&self, id: i32, update: &VolunteerUpdate) -> VolunteerResult<()> {
        self.ensure_available()?;
        if let AvailabilityChange::Replace(slots) = &update.availability {
            check_slots(slots)?;
        }

        let mut tables = self.tables.write().await;
        let Some(volunteer) = tables.volunteers.get_mut(&id) else {
            return Err(VolunteerError::NotFound(format!("volunteer {id}")));
        };
        apply_patch(volunteer, &update.fields);
        volunteer.updated_at = Utc::now();

        if let AvailabilityChange::Replace(slots) = &update.availability {
            tables.slots.retain(|slot| slot.volunteer_id != id);
            tables.insert_slots(id, slots);
        }

        Ok(())
    }

    async fn delete(&self, id: i32) -> VolunteerResult<()> {
        self.ensure_available()?;

        let mut tables = self.tables.write().await;
        tables.volunteers.remove(&id);
        tables.slots.retain(|slot| slot.volunteer_id != id);

        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get_or_create(&self, identity: &ExternalIdentity, role_on_create: Role) -> VolunteerResult<User> {
        let mut users = self.users.write().await;
        let now = Utc::now();

        let user = users
            .entry(identity.id)
            .and_modify(|user| {
                user.last_signed_in = now;
                user.updated_at = now;
            })
            .or_insert_with(|| User {
                id: identity.id,
                name: identity.name.clone(),
                email: identity.email.clone(),
                role: role_on_create,
                created_at: now,
                updated_at: now,
                last_signed_in: now,
            });

        Ok(user.clone())
    }
}
