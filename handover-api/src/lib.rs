//! HANDOVER API - REST Layer
//!
//! Axum server for the change-duty listing. Reads pages from PostgreSQL,
//! resolves client, caregiver and user names through `handover-enrich`, and
//! returns JSON.

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod macros;
pub mod middleware;
#[cfg(feature = "openapi")]
pub mod openapi;
pub mod routes;
pub mod state;
pub mod telemetry;

// Re-export commonly used types
pub use config::ApiConfig;
pub use db::{DbClient, DbConfig, Directory, PgChangeDutyStore, PgNameResolver};
pub use error::{ApiError, ApiResult, ErrorCode};
#[cfg(feature = "openapi")]
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use state::{AppState, SharedEnricher, SharedStore};
