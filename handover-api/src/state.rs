//! Shared application state for Axum routers.

use std::sync::Arc;
use std::time::Instant;

use handover_enrich::Enricher;
use handover_storage::ChangeDutyStore;

/// The primary store as shared by every handler.
pub type SharedStore = Arc<dyn ChangeDutyStore>;

/// The enrichment pipeline as shared by every handler.
pub type SharedEnricher = Arc<Enricher>;

/// Application-wide state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub enricher: SharedEnricher,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(store: SharedStore, enricher: Enricher) -> Self {
        Self {
            store,
            enricher: Arc::new(enricher),
            start_time: Instant::now(),
        }
    }
}

crate::impl_from_ref!(SharedStore, store);
crate::impl_from_ref!(SharedEnricher, enricher);
crate::impl_from_ref!(Instant, start_time);
