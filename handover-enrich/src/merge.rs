//! Merge resolved names back onto records

use handover_core::{ChangeDuty, ChangeDutyResponse, NameBundle, NameMapping, Role};

/// Build one response per record, in input order.
///
/// A missing entry renders as an empty name: either the reference was empty
/// or the resolver does not know the id. Failures only ever show up as the
/// fallback labels the coordinator already put in the mapping.
pub fn merge_names(duties: &[ChangeDuty], names: &NameBundle) -> Vec<ChangeDutyResponse> {
    duties.iter().map(|duty| merge_one(duty, names)).collect()
}

fn merge_one(duty: &ChangeDuty, names: &NameBundle) -> ChangeDutyResponse {
    let name_for = |role: Role| display_name(names.get(role), duty.reference(role));

    ChangeDutyResponse {
        id: duty.id.clone(),
        client_id: duty.client_id.clone(),
        client_name: name_for(Role::Client),
        old_caregiver_id: duty.old_caregiver_id.clone(),
        old_caregiver_name: name_for(Role::OldCaregiver),
        new_caregiver_id: duty.new_caregiver_id.clone(),
        new_caregiver_name: name_for(Role::NewCaregiver),
        user_id: duty.user_id.clone(),
        user_name: name_for(Role::User),
        start_time: duty.start_time,
        end_time: duty.end_time,
        duty_situation: duty.duty_situation.clone(),
        duty_description: duty.duty_description.clone(),
        created_at: duty.created_at,
        updated_at: duty.updated_at,
        uuid: duty.uuid,
    }
}

fn display_name(mapping: &NameMapping, id: &str) -> String {
    if id.is_empty() {
        return String::new();
    }
    mapping.get(id).cloned().unwrap_or_default()
}
