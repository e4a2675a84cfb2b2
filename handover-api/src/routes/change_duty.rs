//! Change-Duty REST API Routes
//!
//! `GET /api/v1/change-duties` reads one page from the primary store,
//! resolves every reference to a display name and returns the records
//! newest first.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use handover_core::{report_flag, ChangeDutyQuery, ChangeDutyResponse, PageRequest, Timestamp};
use serde::Deserialize;

use crate::error::ApiResult;
use crate::state::{AppState, SharedEnricher, SharedStore};

// ============================================================================
// QUERY PARAMETERS
// ============================================================================

/// Raw query parameters.
///
/// Kept as strings so malformed values fall back to defaults instead of
/// rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListChangeDutiesParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub report: Option<String>,
}

impl ListChangeDutiesParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_query(self.page.as_deref(), self.limit.as_deref())
    }

    pub fn report(&self) -> bool {
        report_flag(self.report.as_deref())
    }

    pub fn to_query(&self, now: Timestamp) -> ChangeDutyQuery {
        ChangeDutyQuery::new(self.page_request(), self.report(), now)
    }
}

// ============================================================================
// HANDLERS
// ============================================================================

/// GET /api/v1/change-duties - List change duties with resolved names
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/v1/change-duties",
    tag = "Change Duties",
    params(
        ("page" = Option<String>, Query, description = "Page number, 1-based. Non-numeric or < 1 means 1"),
        ("limit" = Option<String>, Query, description = "Page size. Non-numeric or < 1 means 10"),
        ("report" = Option<String>, Query, description = "Exactly \"true\" limits results to records created in the last 30 days"),
    ),
    responses(
        (status = 200, description = "Enriched change duties, newest start time first", body = Vec<ChangeDutyResponse>),
        (status = 500, description = "Store or enrichment failure", body = crate::error::ApiError),
    ),
))]
pub async fn list_change_duties(
    State(store): State<SharedStore>,
    State(enricher): State<SharedEnricher>,
    Query(params): Query<ListChangeDutiesParams>,
) -> ApiResult<Json<Vec<ChangeDutyResponse>>> {
    let query = params.to_query(Utc::now());
    tracing::debug!(
        skip = query.skip,
        limit = query.limit,
        created_since = ?query.created_since,
        "Listing change duties"
    );

    let duties = store.find_page(&query).await?;
    let responses = enricher.enrich(&duties).await?;

    Ok(Json(responses))
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the change-duty routes router.
pub fn create_router() -> Router<AppState> {
    Router::new().route("/", get(list_change_duties))
}
