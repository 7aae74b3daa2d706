use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::string_enum;

string_enum! {
    pub enum Role as "role" {
        User => "user",
        Admin => "admin",
    }
}

/// An account that signed in through the external identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_signed_in: DateTime<Utc>,
}

/// Identity asserted by a verified bearer token, before it is matched to a
/// local [`User`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalIdentity {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
}

/// The actor behind a request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Principal {
    #[default]
    Anonymous,
    User(User),
}

impl Principal {
    pub fn user(&self) -> Option<&User> {
        match self {
            Principal::Anonymous => None,
            Principal::User(user) => Some(user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Principal::User(_))
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Principal::User(user) if user.role == Role::Admin)
    }

    pub fn email(&self) -> Option<&str> {
        self.user().map(|user| user.email.as_str())
    }
}
