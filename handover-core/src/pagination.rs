//! Pagination and query window for change-duty listings
//!
//! Query parameters arrive as raw strings. Anything that does not parse as a
//! positive integer falls back to the default instead of failing the request.

use chrono::Duration;

use crate::identity::Timestamp;

/// Page number used when the parameter is missing or invalid.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when the parameter is missing or invalid.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Lookback window applied when the report flag is set.
pub const REPORT_WINDOW_DAYS: i64 = 30;

/// A coerced page request. Both fields are always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Build a request, replacing values below 1 with the defaults.
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: if page < 1 { DEFAULT_PAGE } else { page },
            limit: if limit < 1 { DEFAULT_PAGE_SIZE } else { limit },
        }
    }

    /// Parse raw query values.
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: parse_positive(page).unwrap_or(DEFAULT_PAGE),
            limit: parse_positive(limit).unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }

    /// Records to skip: `(page - 1) * limit`, saturating at `i64::MAX`.
    pub fn skip(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

fn parse_positive(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.parse::<i64>().ok())
        .filter(|value| *value >= 1)
}

/// Only the exact string `true` enables the report window.
pub fn report_flag(raw: Option<&str>) -> bool {
    raw == Some("true")
}

/// The query handed to the primary store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeDutyQuery {
    pub skip: i64,
    pub limit: i64,
    /// Lower bound on `created_at`, inclusive.
    pub created_since: Option<Timestamp>,
}

impl ChangeDutyQuery {
    /// `now` is the request time; the report window is measured back from it.
    pub fn new(page: PageRequest, report: bool, now: Timestamp) -> Self {
        let created_since = report.then(|| now - Duration::days(REPORT_WINDOW_DAYS));
        Self {
            skip: page.skip(),
            limit: page.limit,
            created_since,
        }
    }
}
