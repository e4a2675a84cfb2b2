//! Reference roles on a change duty

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four foreign references a change duty carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The client receiving care
    Client,
    /// Caregiver handing the duty over
    OldCaregiver,
    /// Caregiver taking the duty over
    NewCaregiver,
    /// Staff user who registered the change
    User,
}

impl Role {
    /// All roles in record field order.
    pub const ALL: [Role; 4] = [
        Role::Client,
        Role::OldCaregiver,
        Role::NewCaregiver,
        Role::User,
    ];

    /// Whether ids for this role must be object ids.
    ///
    /// Client ids are owned by another subsystem and use its own format.
    pub fn validates_ids(self) -> bool {
        !matches!(self, Role::Client)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::OldCaregiver => "old_caregiver",
            Role::NewCaregiver => "new_caregiver",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
