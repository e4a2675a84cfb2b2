//! HANDOVER Core - Entity Types
//!
//! Data structures shared by every HANDOVER crate: change-duty records and
//! their enriched responses, the four reference roles, object-id validation,
//! pagination, fallback labels, error types, and the `NameResolver` seam.
//! No I/O happens here.

pub mod entities;
pub mod error;
pub mod identity;
pub mod names;
pub mod pagination;
pub mod resolver;
pub mod role;

pub use entities::{ChangeDuty, ChangeDutyResponse};
pub use error::{EnrichError, IdError, ResolveError, StorageError};
pub use identity::{is_valid_object_id, EntityId, ObjectId, Timestamp};
pub use names::{
    fallback_label, fallback_mapping, is_fallback_label, FallbackReason, IdentifierSet,
    IdentifierSets, NameBundle, NameMapping, PerRole, INVALID_ID_PREFIX, LOOKUP_FAILED_PREFIX,
};
pub use pagination::{
    report_flag, ChangeDutyQuery, PageRequest, DEFAULT_PAGE, DEFAULT_PAGE_SIZE,
    REPORT_WINDOW_DAYS,
};
pub use resolver::{NameResolver, ResolveResult};
pub use role::Role;
