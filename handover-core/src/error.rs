//! Error types for HANDOVER operations

use std::time::Duration;

use thiserror::Error;

use crate::role::Role;

/// Identifier parsing errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdError {
    #[error("Invalid object id '{value}': {reason}")]
    InvalidObjectId { value: String, reason: String },
}

/// Primary store errors. All of these end the request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Query failed: {reason}")]
    QueryFailed { reason: String },

    #[error("Failed to decode {entity} row: {reason}")]
    DecodeFailed { entity: String, reason: String },
}

/// Name resolver errors.
///
/// These never reach a caller: the coordinator turns them into fallback
/// labels.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Resolver {resolver} unavailable: {reason}")]
    Unavailable { resolver: String, reason: String },

    #[error("Resolver {resolver} query failed: {reason}")]
    QueryFailed { resolver: String, reason: String },

    #[error("Resolver {resolver} timed out after {elapsed:?}")]
    Timeout { resolver: String, elapsed: Duration },
}

/// Enrichment errors that end the request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EnrichError {
    #[error("Resolution task for {role} did not complete: {reason}")]
    TaskJoin { role: Role, reason: String },
}
