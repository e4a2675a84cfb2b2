//! HANDOVER Storage - Primary Store Seam
//!
//! The change-duty listing reads one page of records from the primary store.
//! This crate defines that contract and an in-memory implementation used by
//! tests and local development. The PostgreSQL implementation lives in the
//! API crate next to its connection pool.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use handover_core::{ChangeDuty, ChangeDutyQuery, StorageError};
use tokio::sync::RwLock;

/// Result type alias for store operations.
pub type StorageResult<T> = Result<T, StorageError>;

// ============================================================================
// STORE TRAIT
// ============================================================================

/// Paginated access to change duties.
#[async_trait]
pub trait ChangeDutyStore: Send + Sync {
    /// Fetch one page of change duties.
    ///
    /// Records are ordered by `start_time` descending. When
    /// `query.created_since` is set only records created at or after it are
    /// returned. `skip` and `limit` are applied after filtering and ordering.
    async fn find_page(&self, query: &ChangeDutyQuery) -> StorageResult<Vec<ChangeDuty>>;

    /// Check if the store is reachable.
    async fn health_check(&self) -> StorageResult<bool>;
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

/// In-memory change-duty store.
///
/// Clones share the same data. The store can be switched to an unavailable
/// state to exercise the fatal error path.
#[derive(Debug, Clone, Default)]
pub struct InMemoryChangeDutyStore {
    duties: Arc<RwLock<Vec<ChangeDuty>>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryChangeDutyStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with `duties`.
    pub fn with_duties(duties: Vec<ChangeDuty>) -> Self {
        Self {
            duties: Arc::new(RwLock::new(duties)),
            unavailable: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn insert(&self, duty: ChangeDuty) {
        self.duties.write().await.push(duty);
    }

    pub async fn len(&self) -> usize {
        self.duties.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.duties.read().await.is_empty()
    }

    /// Make every subsequent call fail with `StorageError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> StorageResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable {
                reason: "in-memory store marked unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ChangeDutyStore for InMemoryChangeDutyStore {
    async fn find_page(&self, query: &ChangeDutyQuery) -> StorageResult<Vec<ChangeDuty>> {
        self.ensure_available()?;

        let duties = self.duties.read().await;
        let mut matching: Vec<&ChangeDuty> = duties
            .iter()
            .filter(|duty| {
                query
                    .created_since
                    .map_or(true, |since| duty.created_at >= since)
            })
            .collect();
        matching.sort_by(|a, b| b.start_time.cmp(&a.start_time));

        let skip = usize::try_from(query.skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);
        Ok(matching
            .into_iter()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> StorageResult<bool> {
        Ok(!self.unavailable.load(Ordering::SeqCst))
    }
}
