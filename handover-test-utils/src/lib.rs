//! HANDOVER Test Utilities
//!
//! Shared test infrastructure for the HANDOVER workspace:
//! - Mock name resolvers (static, failing, delayed, panicking)
//! - Fixtures for change duties and object ids
//! - Proptest generators for records and reference ids

// Re-export the in-memory store from its source crate
pub use handover_storage::InMemoryChangeDutyStore;

pub use handover_core::{
    ChangeDuty, ChangeDutyResponse, NameMapping, NameResolver, ResolveError, ResolveResult,
    Role, Timestamp,
};

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

// ============================================================================
// MOCK RESOLVERS
// ============================================================================

/// Resolver backed by a fixed directory.
///
/// Unknown ids are omitted from the result, as a real directory would do.
/// Every call is recorded.
#[derive(Debug, Clone)]
pub struct StaticNameResolver {
    name: String,
    directory: Arc<NameMapping>,
    calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl StaticNameResolver {
    pub fn new<K, V>(name: impl Into<String>, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            directory: Arc::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A resolver that knows nobody.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::<(String, String)>::new())
    }

    /// Id batches received so far, in call order.
    pub async fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl NameResolver for StaticNameResolver {
    fn name(&self) -> &str {
        &self.name
    }

    async fn resolve_names(&self, ids: &[String]) -> ResolveResult<NameMapping> {
        self.calls.lock().await.push(ids.to_vec());
        Ok(ids
            .iter()
            .filter_map(|id| {
                self.directory
                    .get(id)
                    .map(|name| (id.clone(), name.clone()))
            })
            .collect())
    }
}

/// Resolver that always fails.
#[derive(Debug, Clone)]
pub struct FailingNameResolver {
    name: String,
}

impl FailingNameResolver {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl NameResolver for FailingNameResolver {
    fn name(&self) -> &str {
        &self.name
    }

    async fn resolve_names(&self, _ids: &[String]) -> ResolveResult<NameMapping> {
        Err(ResolveError::QueryFailed {
            resolver: self.name.clone(),
            reason: "directory offline".to_string(),
        })
    }
}

/// Wraps another resolver and sleeps before delegating.
#[derive(Debug, Clone)]
pub struct DelayedNameResolver<R> {
    inner: R,
    delay: Duration,
}

impl<R> DelayedNameResolver<R> {
    pub fn new(inner: R, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

#[async_trait]
impl<R: NameResolver> NameResolver for DelayedNameResolver<R> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn resolve_names(&self, ids: &[String]) -> ResolveResult<NameMapping> {
        tokio::time::sleep(self.delay).await;
        self.inner.resolve_names(ids).await
    }
}

/// Resolver that panics, for exercising the task-failure path.
#[derive(Debug, Clone, Default)]
pub struct PanickingNameResolver;

#[async_trait]
impl NameResolver for PanickingNameResolver {
    fn name(&self) -> &str {
        "panicking"
    }

    async fn resolve_names(&self, _ids: &[String]) -> ResolveResult<NameMapping> {
        panic!("resolver exploded");
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

/// A deterministic valid object id.
pub fn object_id_hex(n: u64) -> String {
    format!("{:024x}", n)
}

/// Reference time used by fixtures: 2024-06-01T00:00:00Z.
pub fn base_time() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// A change duty with no references filled in.
pub fn change_duty(id: impl Into<String>, start_time: Timestamp) -> ChangeDuty {
    ChangeDuty {
        id: id.into(),
        client_id: String::new(),
        old_caregiver_id: String::new(),
        new_caregiver_id: String::new(),
        user_id: String::new(),
        start_time,
        end_time: start_time + ChronoDuration::hours(12),
        duty_situation: "pending".to_string(),
        duty_description: "Shift handover".to_string(),
        created_at: start_time - ChronoDuration::days(1),
        updated_at: start_time - ChronoDuration::days(1),
        uuid: Uuid::now_v7(),
    }
}

/// Fill in all four references.
pub fn with_references(
    mut duty: ChangeDuty,
    client_id: &str,
    old_caregiver_id: &str,
    new_caregiver_id: &str,
    user_id: &str,
) -> ChangeDuty {
    duty.client_id = client_id.to_string();
    duty.old_caregiver_id = old_caregiver_id.to_string();
    duty.new_caregiver_id = new_caregiver_id.to_string();
    duty.user_id = user_id.to_string();
    duty
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for HANDOVER records.

    use super::*;
    use chrono::DateTime;
    use proptest::prelude::*;

    /// A valid 24-character object id.
    pub fn arb_object_id_hex() -> impl Strategy<Value = String> {
        any::<[u8; 12]>().prop_map(|bytes| bytes.iter().map(|b| format!("{:02x}", b)).collect())
    }

    /// A string that is never a valid object id.
    pub fn arb_malformed_id() -> impl Strategy<Value = String> {
        "[g-z][a-z0-9-]{0,11}"
    }

    /// A reference id for a role that validates ids: empty, valid, or malformed.
    pub fn arb_validated_reference() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::new()),
            arb_object_id_hex(),
            arb_malformed_id(),
        ]
    }

    /// A client reference: empty or any short token.
    pub fn arb_client_reference() -> impl Strategy<Value = String> {
        prop_oneof![Just(String::new()), "[a-z0-9-]{1,16}"]
    }

    /// A timestamp within a narrow window so equal start times are common.
    pub fn arb_start_time() -> impl Strategy<Value = Timestamp> {
        (0i64..12).prop_map(|hours| base_time() + ChronoDuration::hours(hours))
    }

    pub fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
        (1_600_000_000i64..1_800_000_000).prop_map(|secs| {
            DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_default()
        })
    }

    pub fn arb_change_duty() -> impl Strategy<Value = ChangeDuty> {
        (
            arb_object_id_hex(),
            arb_client_reference(),
            arb_validated_reference(),
            arb_validated_reference(),
            arb_validated_reference(),
            arb_start_time(),
            arb_timestamp(),
            "[a-z ]{0,24}",
            any::<[u8; 16]>(),
        )
            .prop_map(
                |(id, client, old, new, user, start, created, description, uuid)| ChangeDuty {
                    id,
                    client_id: client,
                    old_caregiver_id: old,
                    new_caregiver_id: new,
                    user_id: user,
                    start_time: start,
                    end_time: start + ChronoDuration::hours(8),
                    duty_situation: "pending".to_string(),
                    duty_description: description,
                    created_at: created,
                    updated_at: created,
                    uuid: Uuid::from_bytes(uuid),
                },
            )
    }

    pub fn arb_change_duties(max: usize) -> impl Strategy<Value = Vec<ChangeDuty>> {
        prop::collection::vec(arb_change_duty(), 0..=max)
    }
}
