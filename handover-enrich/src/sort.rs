//! Response ordering

use handover_core::ChangeDutyResponse;

/// Most recent `start_time` first. Stable: equal start times keep their
/// input order.
pub fn sort_by_start_time_desc(responses: &mut [ChangeDutyResponse]) {
    responses.sort_by(|a, b| b.start_time.cmp(&a.start_time));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::merge_names;
    use chrono::Duration;
    use handover_core::NameBundle;
    use handover_test_utils::generators::arb_change_duties;
    use handover_test_utils::{base_time, change_duty};
    use proptest::prelude::*;

    #[test]
    fn test_ties_keep_input_order() {
        let t = base_time();
        let duties = vec![
            change_duty("early", t),
            change_duty("tie-1", t + Duration::hours(1)),
            change_duty("late", t + Duration::hours(2)),
            change_duty("tie-2", t + Duration::hours(1)),
        ];
        let mut responses = merge_names(&duties, &NameBundle::default());
        sort_by_start_time_desc(&mut responses);

        let ids: Vec<&str> = responses.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["late", "tie-1", "tie-2", "early"]);
    }

    proptest! {
        #[test]
        fn prop_sorted_descending_and_stable(duties in arb_change_duties(16)) {
            let mut responses = merge_names(&duties, &NameBundle::default());
            // Tag each response with its input position
            for (idx, response) in responses.iter_mut().enumerate() {
                response.id = idx.to_string();
            }
            sort_by_start_time_desc(&mut responses);

            for pair in responses.windows(2) {
                prop_assert!(pair[0].start_time >= pair[1].start_time);
                if pair[0].start_time == pair[1].start_time {
                    let a: usize = pair[0].id.parse().unwrap();
                    let b: usize = pair[1].id.parse().unwrap();
                    prop_assert!(a < b);
                }
            }
        }
    }
}
