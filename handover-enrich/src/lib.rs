//! HANDOVER Enrich - Change-Duty Name Enrichment
//!
//! Turns a page of change duties into responses with human-readable names:
//!
//! 1. [`extract`] collects reference ids per role
//! 2. [`coordinator`] resolves the four id lists concurrently, absorbing
//!    resolver failures into fallback labels
//! 3. [`merge`] joins names back onto each record
//! 4. [`sort`] orders the result by start time, newest first
//!
//! [`Enricher`] runs the four steps in order.

pub mod coordinator;
pub mod extract;
pub mod merge;
pub mod sort;

use std::time::Duration;

use handover_core::{ChangeDuty, ChangeDutyResponse, EnrichError};

pub use coordinator::{resolvers_with_shared_caregiver, Coordinator, Resolvers, TaskOutcome};
pub use extract::extract_identifiers;
pub use merge::merge_names;
pub use sort::sort_by_start_time_desc;

/// The full enrichment pipeline for one page.
#[derive(Clone)]
pub struct Enricher {
    coordinator: Coordinator,
}

impl Enricher {
    pub fn new(resolvers: Resolvers) -> Self {
        Self {
            coordinator: Coordinator::new(resolvers),
        }
    }

    /// Apply a per-resolver deadline. `None` waits indefinitely.
    pub fn with_resolver_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.coordinator = self.coordinator.with_deadline(deadline);
        self
    }

    /// Enrich and sort one page of change duties.
    ///
    /// Fails only when a resolution task could not finish. Resolver errors
    /// show up as fallback labels in the returned names.
    pub async fn enrich(
        &self,
        duties: &[ChangeDuty],
    ) -> Result<Vec<ChangeDutyResponse>, EnrichError> {
        let ids = extract_identifiers(duties);
        let names = self.coordinator.resolve_all(ids).await?;

        let mut responses = merge_names(duties, &names);
        sort_by_start_time_desc(&mut responses);

        tracing::debug!(records = responses.len(), "Change duties enriched");
        Ok(responses)
    }
}
