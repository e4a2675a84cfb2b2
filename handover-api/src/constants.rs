//! Constants for HANDOVER API

// ============================================================================
// CORS
// ============================================================================

/// Default CORS max age in seconds (24 hours)
pub const DEFAULT_CORS_MAX_AGE_SECS: u64 = 86400;

// ============================================================================
// TIMEOUTS
// ============================================================================

/// Default per-resolver deadline in milliseconds
pub const DEFAULT_RESOLVER_TIMEOUT_MS: u64 = 5000;

/// Default whole-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// SERVER
// ============================================================================

/// Default bind host
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";

/// Default bind port
pub const DEFAULT_API_PORT: u16 = 3000;
