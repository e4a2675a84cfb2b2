//! Name mappings, per-role slots, and fallback labels
//!
//! A fallback label is the only way a lookup failure is ever shown to a
//! caller. Two variants exist and their prefixes are part of the response
//! contract:
//! - `name lookup failed: <id>` when the resolver for the role failed
//! - `invalid identifier: <id>` when the role validates ids and `<id>` is
//!   not an object id

use std::collections::HashMap;

use crate::identity::is_valid_object_id;
use crate::role::Role;

/// Identifier → display name, as returned by a resolver.
pub type NameMapping = HashMap<String, String>;

/// Non-empty reference ids collected for one role, in record order.
/// Duplicates and malformed ids are kept.
pub type IdentifierSet = Vec<String>;

/// One id list per role.
pub type IdentifierSets = PerRole<IdentifierSet>;

/// One name mapping per role.
pub type NameBundle = PerRole<NameMapping>;

pub const LOOKUP_FAILED_PREFIX: &str = "name lookup failed: ";
pub const INVALID_ID_PREFIX: &str = "invalid identifier: ";

// ============================================================================
// PER-ROLE SLOTS
// ============================================================================

/// A fixed slot for each role.
///
/// Results are addressed by role, never by position or arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerRole<T> {
    pub client: T,
    pub old_caregiver: T,
    pub new_caregiver: T,
    pub user: T,
}

impl<T> PerRole<T> {
    pub fn get(&self, role: Role) -> &T {
        match role {
            Role::Client => &self.client,
            Role::OldCaregiver => &self.old_caregiver,
            Role::NewCaregiver => &self.new_caregiver,
            Role::User => &self.user,
        }
    }

    pub fn get_mut(&mut self, role: Role) -> &mut T {
        match role {
            Role::Client => &mut self.client,
            Role::OldCaregiver => &mut self.old_caregiver,
            Role::NewCaregiver => &mut self.new_caregiver,
            Role::User => &mut self.user,
        }
    }

    /// Build each slot from its role.
    pub fn from_fn(mut f: impl FnMut(Role) -> T) -> Self {
        Self {
            client: f(Role::Client),
            old_caregiver: f(Role::OldCaregiver),
            new_caregiver: f(Role::NewCaregiver),
            user: f(Role::User),
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(Role, T) -> U) -> PerRole<U> {
        PerRole {
            client: f(Role::Client, self.client),
            old_caregiver: f(Role::OldCaregiver, self.old_caregiver),
            new_caregiver: f(Role::NewCaregiver, self.new_caregiver),
            user: f(Role::User, self.user),
        }
    }
}

// ============================================================================
// FALLBACK LABELS
// ============================================================================

/// Why a fallback label was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FallbackReason {
    LookupFailed,
    InvalidIdentifier,
}

impl FallbackReason {
    /// Classify an id for a role whose resolver failed.
    pub fn classify(role: Role, id: &str) -> Self {
        if role.validates_ids() && !is_valid_object_id(id) {
            FallbackReason::InvalidIdentifier
        } else {
            FallbackReason::LookupFailed
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            FallbackReason::LookupFailed => LOOKUP_FAILED_PREFIX,
            FallbackReason::InvalidIdentifier => INVALID_ID_PREFIX,
        }
    }
}

/// The label shown in place of a name when `role`'s resolver failed.
pub fn fallback_label(role: Role, id: &str) -> String {
    let reason = FallbackReason::classify(role, id);
    format!("{}{}", reason.prefix(), id)
}

/// A mapping that labels every id of a failed role.
pub fn fallback_mapping(role: Role, ids: &[String]) -> NameMapping {
    ids.iter()
        .map(|id| (id.clone(), fallback_label(role, id)))
        .collect()
}

/// Whether a display name is a fallback label.
pub fn is_fallback_label(name: &str) -> bool {
    name.starts_with(LOOKUP_FAILED_PREFIX) || name.starts_with(INVALID_ID_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "65a1f0c2e4b0a1b2c3d4e5f6";

    #[test]
    fn test_client_never_reports_invalid() {
        assert_eq!(
            fallback_label(Role::Client, "not-a-valid-id"),
            "name lookup failed: not-a-valid-id"
        );
    }

    #[test]
    fn test_validated_roles_distinguish_invalid_ids() {
        for role in [Role::OldCaregiver, Role::NewCaregiver, Role::User] {
            assert_eq!(
                fallback_label(role, "not-a-valid-id"),
                "invalid identifier: not-a-valid-id"
            );
            assert_eq!(
                fallback_label(role, VALID),
                format!("name lookup failed: {}", VALID)
            );
        }
    }

    #[test]
    fn test_fallback_mapping_covers_duplicates() {
        let ids = vec![VALID.to_string(), "bad".to_string(), VALID.to_string()];
        let mapping = fallback_mapping(Role::User, &ids);
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping["bad"], "invalid identifier: bad");
        assert!(is_fallback_label(&mapping[VALID]));
    }

    #[test]
    fn test_is_fallback_label() {
        assert!(is_fallback_label("name lookup failed: x"));
        assert!(is_fallback_label("invalid identifier: x"));
        assert!(!is_fallback_label("Maria Souza"));
        assert!(!is_fallback_label(""));
    }

    #[test]
    fn test_per_role_slots() {
        let mut slots = PerRole::from_fn(|role| role.as_str().len());
        assert_eq!(*slots.get(Role::Client), "client".len());
        *slots.get_mut(Role::User) = 0;
        let doubled = slots.map(|_, n| n * 2);
        assert_eq!(doubled.user, 0);
        assert_eq!(doubled.new_caregiver, "new_caregiver".len() * 2);
    }
}
