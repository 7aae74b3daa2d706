use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::availability::{AvailabilityInput, AvailabilitySlot};
use super::string_enum;

pub const DEFAULT_SESSION_DURATION: i32 = 50;

string_enum! {
    /// Program the volunteer serves.
    pub enum Project as "project" {
        BorahaeTerapias => "borahae_terapias",
        PurpleArmy => "purple_army",
    }
}

impl Project {
    pub fn label(&self) -> &'static str {
        match self {
            Project::BorahaeTerapias => "Borahae Terapias",
            Project::PurpleArmy => "Purple Army",
        }
    }
}

string_enum! {
    pub enum ServiceType as "service type" {
        Gratuito => "gratuito",
        ValorSocial => "valor_social",
        Ambos => "ambos",
    }
}

string_enum! {
    pub enum Modality as "modality" {
        Online => "online",
        Presencial => "presencial",
    }
}

string_enum! {
    pub enum Frequency as "frequency" {
        Semanal => "semanal",
        Quinzenal => "quinzenal",
        Pontual => "pontual",
    }
}

string_enum! {
    /// Review state of a registration. Only administrators change it.
    pub enum VolunteerStatus as "status" {
        Ativo => "ativo",
        Inativo => "inativo",
        Pendente => "pendente",
    }
}

impl Default for VolunteerStatus {
    fn default() -> Self {
        VolunteerStatus::Pendente
    }
}

/// A registered professional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volunteer {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub specialization: String,
    pub professional_registration: String,
    pub project: Project,
    pub service_type: ServiceType,
    pub modality: Modality,
    pub session_duration: i32,
    pub frequency: Frequency,
    pub notes: Option<String>,
    /// Only meaningful for [`Modality::Presencial`].
    pub address: Option<String>,
    pub status: VolunteerStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolunteerWithAvailability {
    #[serde(flatten)]
    pub volunteer: Volunteer,
    pub availability: Vec<AvailabilitySlot>,
}

fn default_session_duration() -> i32 {
    DEFAULT_SESSION_DURATION
}

/// Public registration payload (`VolunteerCreateInput`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVolunteerRequest {
    #[validate(length(min = 1, message = "Nome completo é obrigatório"))]
    pub full_name: String,
    #[validate(email(message = "Email inválido"))]
    pub email: String,
    #[validate(length(min = 10, message = "Telefone inválido"))]
    pub phone: String,
    #[validate(length(min = 1, message = "Especialidade é obrigatória"))]
    pub specialization: String,
    #[validate(length(min = 1, message = "Registro profissional é obrigatório"))]
    pub professional_registration: String,
    pub project: Project,
    pub service_type: ServiceType,
    pub modality: Modality,
    #[serde(default = "default_session_duration")]
    #[validate(range(min = 1, message = "Duração da sessão deve ser positiva"))]
    pub session_duration: i32,
    pub frequency: Frequency,
    pub notes: Option<String>,
    pub address: Option<String>,
    /// Required, but may be an empty array.
    #[validate(
        required(message = "Disponibilidade é obrigatória"),
        length(max = 500, message = "Disponibilidade excede 500 horários"),
        nested
    )]
    pub availability: Option<Vec<AvailabilityInput>>,
}

impl CreateVolunteerRequest {
    /// Splits the payload into the volunteer row and its slots. A missing
    /// `availability` yields no slots; [`Validate`] rejects it beforehand.
    pub fn into_parts(self) -> (NewVolunteer, Vec<AvailabilityInput>) {
        let volunteer = NewVolunteer {
            full_name: self.full_name,
            email: self.email,
            phone: self.phone,
            specialization: self.specialization,
            professional_registration: self.professional_registration,
            project: self.project,
            service_type: self.service_type,
            modality: self.modality,
            session_duration: self.session_duration,
            frequency: self.frequency,
            notes: self.notes,
            address: self.address,
        };
        (volunteer, self.availability.unwrap_or_default())
    }
}

/// Scalar columns of a volunteer about to be inserted. Status is always
/// [`VolunteerStatus::Pendente`] and timestamps are assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVolunteer {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub specialization: String,
    pub professional_registration: String,
    pub project: Project,
    pub service_type: ServiceType,
    pub modality: Modality,
    pub session_duration: i32,
    pub frequency: Frequency,
    pub notes: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateVolunteerResponse {
    pub id: i32,
    pub message: String,
}

/// Administrator update payload, the `data` of `volunteers.update`.
///
/// `availability` distinguishes "absent" (keep the current slots) from
/// "present", which replaces the whole set even when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVolunteerData {
    #[validate(length(min = 1, message = "Nome completo é obrigatório"))]
    pub full_name: Option<String>,
    #[validate(email(message = "Email inválido"))]
    pub email: Option<String>,
    #[validate(length(min = 10, message = "Telefone inválido"))]
    pub phone: Option<String>,
    #[validate(length(min = 1, message = "Especialidade é obrigatória"))]
    pub specialization: Option<String>,
    #[validate(length(min = 1, message = "Registro profissional é obrigatório"))]
    pub professional_registration: Option<String>,
    pub project: Option<Project>,
    pub service_type: Option<ServiceType>,
    pub modality: Option<Modality>,
    #[validate(range(min = 1, message = "Duração da sessão deve ser positiva"))]
    pub session_duration: Option<i32>,
    pub frequency: Option<Frequency>,
    pub notes: Option<String>,
    pub address: Option<String>,
    pub status: Option<VolunteerStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "Disponibilidade excede 500 horários"), nested)]
    pub availability: Option<Vec<AvailabilityInput>>,
}

/// Scalar columns to overwrite. `None` leaves the column as stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolunteerPatch {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub specialization: Option<String>,
    pub professional_registration: Option<String>,
    pub project: Option<Project>,
    pub service_type: Option<ServiceType>,
    pub modality: Option<Modality>,
    pub session_duration: Option<i32>,
    pub frequency: Option<Frequency>,
    pub notes: Option<String>,
    pub address: Option<String>,
    pub status: Option<VolunteerStatus>,
}

/// What happens to the stored slot set during an update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AvailabilityChange {
    #[default]
    Keep,
    /// Delete every existing slot, then insert exactly these.
    Replace(Vec<AvailabilityInput>),
}

/// A validated update, with the scalar patch and the slot change kept apart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolunteerUpdate {
    pub fields: VolunteerPatch,
    pub availability: AvailabilityChange,
}

impl From<UpdateVolunteerData> for VolunteerUpdate {
    fn from(data: UpdateVolunteerData) -> Self {
        let availability = match data.availability {
            Some(slots) => AvailabilityChange::Replace(slots),
            None => AvailabilityChange::Keep,
        };

        VolunteerUpdate {
            fields: VolunteerPatch {
                full_name: data.full_name,
                email: data.email,
                phone: data.phone,
                specialization: data.specialization,
                professional_registration: data.professional_registration,
                project: data.project,
                service_type: data.service_type,
                modality: data.modality,
                session_duration: data.session_duration,
                frequency: data.frequency,
                notes: data.notes,
                address: data.address,
                status: data.status,
            },
            availability,
        }
    }
}

/// Reply to `volunteers.update` and `volunteers.delete`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationResponse {
    pub success: bool,
    pub message: String,
}

impl MutationResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Path parameter of get/update/delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct VolunteerIdInput {
    #[validate(range(min = 1, message = "ID inválido"))]
    pub id: i32,
}
