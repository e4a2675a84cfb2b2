//! Change-duty records and their enriched responses

use serde::{Deserialize, Serialize};

use crate::identity::{EntityId, Timestamp};
use crate::role::Role;

/// A caregiver shift handover as stored in the primary store.
///
/// Reference fields are opaque strings and may be empty when the reference
/// was never filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ChangeDuty {
    pub id: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub old_caregiver_id: String,
    #[serde(default)]
    pub new_caregiver_id: String,
    #[serde(default)]
    pub user_id: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub start_time: Timestamp,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub end_time: Timestamp,
    #[serde(default)]
    pub duty_situation: String,
    #[serde(default)]
    pub duty_description: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub created_at: Timestamp,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub updated_at: Timestamp,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub uuid: EntityId,
}

impl ChangeDuty {
    /// The raw reference id for a role.
    pub fn reference(&self, role: Role) -> &str {
        match role {
            Role::Client => &self.client_id,
            Role::OldCaregiver => &self.old_caregiver_id,
            Role::NewCaregiver => &self.new_caregiver_id,
            Role::User => &self.user_id,
        }
    }
}

/// A change duty with every reference resolved to a display name.
///
/// Name fields are never absent: they hold the resolved name, an empty
/// string when there is nothing to resolve, or a fallback label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ChangeDutyResponse {
    pub id: String,
    pub client_id: String,
    pub client_name: String,
    pub old_caregiver_id: String,
    pub old_caregiver_name: String,
    pub new_caregiver_id: String,
    pub new_caregiver_name: String,
    pub user_id: String,
    pub user_name: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub start_time: Timestamp,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub end_time: Timestamp,
    pub duty_situation: String,
    pub duty_description: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub created_at: Timestamp,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub updated_at: Timestamp,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub uuid: EntityId,
}

impl ChangeDutyResponse {
    pub fn reference(&self, role: Role) -> &str {
        match role {
            Role::Client => &self.client_id,
            Role::OldCaregiver => &self.old_caregiver_id,
            Role::NewCaregiver => &self.new_caregiver_id,
            Role::User => &self.user_id,
        }
    }

    /// The display name resolved for a role.
    pub fn name(&self, role: Role) -> &str {
        match role {
            Role::Client => &self.client_name,
            Role::OldCaregiver => &self.old_caregiver_name,
            Role::NewCaregiver => &self.new_caregiver_name,
            Role::User => &self.user_name,
        }
    }
}
