//! Name resolver seam
//!
//! Each reference role is backed by a resolver that turns a batch of ids
//! into display names. Resolvers live in other subsystems; this crate only
//! fixes the contract.

use async_trait::async_trait;

use crate::error::ResolveError;
use crate::names::NameMapping;

/// Result type alias for resolver calls.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Batch id → name lookup for one kind of referenced entity.
///
/// On success the mapping holds an entry for every valid id that was found.
/// Ids unknown to the source may be omitted. A resolver either succeeds for
/// the whole batch or fails for the whole batch.
#[async_trait]
pub trait NameResolver: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &str;

    /// Resolve `ids` to display names. `ids` may contain duplicates and
    /// malformed values.
    async fn resolve_names(&self, ids: &[String]) -> ResolveResult<NameMapping>;
}
