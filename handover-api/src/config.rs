//! API Configuration Module
//!
//! CORS, request timeout, and resolver deadline settings. Configuration is
//! loaded from environment variables with development-friendly defaults.

use std::time::Duration;

use crate::constants::{
    DEFAULT_CORS_MAX_AGE_SECS, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_RESOLVER_TIMEOUT_MS,
};

// ============================================================================
// API CONFIGURATION
// ============================================================================

/// API configuration for CORS and timeouts.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    // ========================================================================
    // CORS Configuration
    // ========================================================================
    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins (dev mode).
    /// Example: "https://handover.run,https://app.handover.run"
    pub cors_origins: Vec<String>,

    /// Whether to allow credentials in CORS requests.
    pub cors_allow_credentials: bool,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,

    // ========================================================================
    // Timeouts
    // ========================================================================
    /// Deadline for each name resolver call. Always shorter than
    /// `request_timeout`, so a slow directory degrades to fallback labels
    /// before the request itself times out.
    pub resolver_timeout: Duration,

    /// Deadline for a whole HTTP request.
    pub request_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(), // Empty = allow all
            cors_allow_credentials: false,
            cors_max_age_secs: DEFAULT_CORS_MAX_AGE_SECS,
            resolver_timeout: Duration::from_millis(DEFAULT_RESOLVER_TIMEOUT_MS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `HANDOVER_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `HANDOVER_CORS_ALLOW_CREDENTIALS`: "true" or "false" (default: false)
    /// - `HANDOVER_CORS_MAX_AGE_SECS`: Preflight cache duration (default: 86400)
    /// - `HANDOVER_RESOLVER_TIMEOUT_MS`: Per-resolver deadline (default: 5000, 0 = default).
    ///   Values at or above the request timeout are replaced, see [`ApiConfig::with_timeouts`]
    /// - `HANDOVER_REQUEST_TIMEOUT_SECS`: Whole-request deadline (default: 30)
    pub fn from_env() -> Self {
        let cors_origins = std::env::var("HANDOVER_CORS_ORIGINS")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let cors_allow_credentials = std::env::var("HANDOVER_CORS_ALLOW_CREDENTIALS")
            .ok()
            .map(|s| s.to_lowercase() == "true")
            .unwrap_or(false);

        let cors_max_age_secs = std::env::var("HANDOVER_CORS_MAX_AGE_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_CORS_MAX_AGE_SECS);

        let resolver_timeout_ms: u64 = std::env::var("HANDOVER_RESOLVER_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_RESOLVER_TIMEOUT_MS);
        let resolver_timeout =
            (resolver_timeout_ms > 0).then(|| Duration::from_millis(resolver_timeout_ms));
        let request_timeout = Duration::from_secs(
            std::env::var("HANDOVER_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        );

        Self {
            cors_origins,
            cors_allow_credentials,
            cors_max_age_secs,
            ..Self::default()
        }
        .with_timeouts(resolver_timeout, request_timeout)
    }

    /// Set both timeouts, keeping the resolver deadline below the request
    /// timeout.
    ///
    /// A missing or too-large resolver deadline is replaced by the default,
    /// or by half the request timeout when even the default does not fit.
    pub fn with_timeouts(mut self, resolver: Option<Duration>, request: Duration) -> Self {
        let default = Duration::from_millis(DEFAULT_RESOLVER_TIMEOUT_MS);
        let bounded = match resolver {
            Some(deadline) if deadline < request => deadline,
            _ if default < request => default,
            _ => request / 2,
        };
        if resolver.is_some_and(|deadline| deadline != bounded) {
            tracing::warn!(
                requested = ?resolver,
                resolver_timeout = ?bounded,
                request_timeout = ?request,
                "Resolver timeout must be below the request timeout, adjusted"
            );
        }

        self.resolver_timeout = bounded;
        self.request_timeout = request;
        self
    }

    /// Check if running in production mode (strict CORS).
    pub fn is_production(&self) -> bool {
        !self.cors_origins.is_empty()
    }

    /// Check if a given origin is allowed.
    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        if self.cors_origins.is_empty() {
            // Dev mode: allow all
            return true;
        }

        self.cors_origins.iter().any(|allowed| {
            if allowed == origin {
                return true;
            }
            // Wildcard subdomains: *.handover.run
            if let Some(pattern) = allowed.strip_prefix("*.") {
                if let Some(origin_domain) = origin.strip_prefix("https://") {
                    return origin_domain.ends_with(&format!(".{}", pattern));
                }
            }
            false
        })
    }
}
