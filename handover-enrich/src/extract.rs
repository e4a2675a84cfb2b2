//! Identifier extraction
//!
//! Collects the reference ids of a page into one list per role. Malformed
//! ids are kept: the coordinator needs them to label failures.

use handover_core::{is_valid_object_id, ChangeDuty, IdentifierSets, Role};

/// Collect non-empty reference ids per role, in record order.
pub fn extract_identifiers(duties: &[ChangeDuty]) -> IdentifierSets {
    let mut sets = IdentifierSets::default();

    for duty in duties {
        for role in Role::ALL {
            let id = duty.reference(role);
            if id.is_empty() {
                continue;
            }
            if role.validates_ids() && !is_valid_object_id(id) {
                tracing::debug!(%role, id, duty_id = %duty.id, "Malformed reference id");
            }
            sets.get_mut(role).push(id.to_string());
        }
    }

    sets
}
