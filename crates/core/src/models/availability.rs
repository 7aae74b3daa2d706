use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Wall-clock time of day as `HH:mm`, 00:00 through 23:59.
pub static TIME_OF_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("valid time-of-day pattern"));

/// One weekly recurring window in which a volunteer can be reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySlot {
    pub id: i32,
    pub volunteer_id: i32,
    /// 0 = Sunday through 6 = Saturday.
    pub day_of_week: i32,
    pub start_time: String,
    pub end_time: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AvailabilitySlot {
    /// The slot as submitted, without storage identity.
    pub fn window(&self) -> AvailabilityInput {
        AvailabilityInput {
            day_of_week: self.day_of_week,
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
        }
    }
}

/// A slot as submitted on create or as part of an availability replacement.
///
/// No ordering between `start_time` and `end_time` is enforced, and slots of
/// the same day may overlap.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityInput {
    #[validate(range(min = 0, max = 6, message = "Dia da semana inválido (0-6)"))]
    pub day_of_week: i32,
    #[validate(regex(path = *TIME_OF_DAY, message = "Formato de hora inválido (HH:mm)"))]
    pub start_time: String,
    #[validate(regex(path = *TIME_OF_DAY, message = "Formato de hora inválido (HH:mm)"))]
    pub end_time: String,
}
