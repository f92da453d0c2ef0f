use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MemberId, MemberName};

/// A registry entry. This is also the persisted JSON shape, so decoding a
/// stored record re-validates its id and name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: MemberName,
    #[serde(
        rename = "registration",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub registration_time: Option<DateTime<Utc>>,
}

impl Member {
    pub fn new(name: MemberName) -> Self {
        Self {
            id: MemberId::default(),
            name,
            registration_time: Some(Utc::now()),
        }
    }

    /// Replaces the name, keeping the id and registration time.
    pub fn renamed(self, name: MemberName) -> Self {
        Self { name, ..self }
    }
}
