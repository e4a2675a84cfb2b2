//! Router tests for the change-duty listing and health endpoints
//!
//! Requests go through the full layered router with `oneshot`, backed by the
//! in-memory store and mock resolvers.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration as ChronoDuration, Utc};
use handover_api::routes::health::{HealthResponse, HealthStatus};
use handover_api::{create_api_router, ApiConfig, ApiError, AppState, ErrorCode};
use handover_core::{is_fallback_label, ChangeDutyQuery, StorageError};
use handover_enrich::{resolvers_with_shared_caregiver, Enricher, Resolvers};
use handover_storage::{ChangeDutyStore, StorageResult};
use handover_test_utils::*;
use serde::de::DeserializeOwned;
use tower::ServiceExt;

type TestResult = Result<(), Box<dyn std::error::Error>>;

// ============================================================================
// FIXTURES
// ============================================================================

fn directory_resolvers() -> Resolvers {
    resolvers_with_shared_caregiver(
        Arc::new(StaticNameResolver::new(
            "clients",
            [("client-1", "Ana Lima"), ("client-2", "Eva Rocha")],
        )),
        Arc::new(StaticNameResolver::new(
            "caregivers",
            [
                (object_id_hex(1), "Bruno Reis"),
                (object_id_hex(2), "Carla Dias"),
            ],
        )),
        Arc::new(StaticNameResolver::new("users", [(object_id_hex(9), "Dora Melo")])),
    )
}

fn three_duties() -> Vec<ChangeDuty> {
    let t = base_time();
    let refs = |duty| {
        with_references(
            duty,
            "client-1",
            &object_id_hex(1),
            &object_id_hex(2),
            &object_id_hex(9),
        )
    };
    vec![
        refs(change_duty("morning", t)),
        refs(change_duty("night", t + ChronoDuration::hours(16))),
        refs(change_duty("afternoon", t + ChronoDuration::hours(8))),
    ]
}

fn app(store: Arc<dyn ChangeDutyStore>, resolvers: Resolvers, config: ApiConfig) -> Router {
    let enricher = Enricher::new(resolvers).with_resolver_deadline(Some(config.resolver_timeout));
    create_api_router(AppState::new(store, enricher), &config)
}

fn router_with(store: Arc<dyn ChangeDutyStore>, resolvers: Resolvers) -> Router {
    app(store, resolvers, ApiConfig::default())
}

fn router_for(duties: Vec<ChangeDuty>) -> Router {
    router_with(
        Arc::new(InMemoryChangeDutyStore::with_duties(duties)),
        directory_resolvers(),
    )
}

async fn get(router: Router, uri: &str) -> Result<(StatusCode, Vec<u8>), Box<dyn std::error::Error>> {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty())?)
        .await?;
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, body.to_vec()))
}

async fn get_json<T: DeserializeOwned>(
    router: Router,
    uri: &str,
) -> Result<(StatusCode, T), Box<dyn std::error::Error>> {
    let (status, body) = get(router, uri).await?;
    Ok((status, serde_json::from_slice(&body)?))
}

/// Store whose every query panics.
struct PanickingStore;

#[async_trait]
impl ChangeDutyStore for PanickingStore {
    async fn find_page(&self, _query: &ChangeDutyQuery) -> StorageResult<Vec<ChangeDuty>> {
        panic!("store exploded")
    }

    async fn health_check(&self) -> StorageResult<bool> {
        Ok(true)
    }
}

/// Store whose every query fails to decode.
struct CorruptStore;

#[async_trait]
impl ChangeDutyStore for CorruptStore {
    async fn find_page(&self, _query: &ChangeDutyQuery) -> StorageResult<Vec<ChangeDuty>> {
        Err(StorageError::DecodeFailed {
            entity: "change_duty".to_string(),
            reason: "column start_time: unexpected null".to_string(),
        })
    }

    async fn health_check(&self) -> StorageResult<bool> {
        Ok(true)
    }
}

/// Store whose queries never finish within a test.
struct HungStore;

#[async_trait]
impl ChangeDutyStore for HungStore {
    async fn find_page(&self, _query: &ChangeDutyQuery) -> StorageResult<Vec<ChangeDuty>> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(Vec::new())
    }

    async fn health_check(&self) -> StorageResult<bool> {
        Ok(true)
    }
}

// ============================================================================
// LISTING
// ============================================================================

#[tokio::test]
async fn first_page_is_enriched_and_sorted() -> TestResult {
    let (status, responses): (_, Vec<ChangeDutyResponse>) =
        get_json(router_for(three_duties()), "/api/v1/change-duties?page=1&limit=10").await?;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = responses.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["night", "afternoon", "morning"]);

    for response in &responses {
        for role in Role::ALL {
            assert!(!is_fallback_label(response.name(role)));
        }
        assert_eq!(response.client_name, "Ana Lima");
        assert_eq!(response.old_caregiver_name, "Bruno Reis");
        assert_eq!(response.new_caregiver_name, "Carla Dias");
        assert_eq!(response.user_name, "Dora Melo");
    }
    Ok(())
}

#[tokio::test]
async fn malformed_paging_falls_back_to_defaults() -> TestResult {
    let t = base_time();
    let duties: Vec<ChangeDuty> = (0..15)
        .map(|i| change_duty(format!("duty-{i:02}"), t + ChronoDuration::hours(i)))
        .collect();

    let (status, responses): (_, Vec<ChangeDutyResponse>) =
        get_json(router_for(duties), "/api/v1/change-duties?page=abc&limit=0").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(responses.len(), 10);
    assert_eq!(responses[0].id, "duty-14");
    assert_eq!(responses[9].id, "duty-05");
    Ok(())
}

#[tokio::test]
async fn second_page_skips_the_first() -> TestResult {
    let t = base_time();
    let duties: Vec<ChangeDuty> = (0..5)
        .map(|i| change_duty(format!("duty-{i}"), t + ChronoDuration::hours(i)))
        .collect();

    let (_, responses): (_, Vec<ChangeDutyResponse>) =
        get_json(router_for(duties), "/api/v1/change-duties?page=2&limit=2").await?;

    let ids: Vec<&str> = responses.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["duty-2", "duty-1"]);
    Ok(())
}

#[tokio::test]
async fn report_limits_to_recent_records() -> TestResult {
    let now = Utc::now();
    let mut recent = change_duty("recent", now - ChronoDuration::days(2));
    recent.created_at = now - ChronoDuration::days(1);
    let mut old = change_duty("old", now - ChronoDuration::days(60));
    old.created_at = now - ChronoDuration::days(61);
    let duties = vec![recent, old];

    let (_, responses): (_, Vec<ChangeDutyResponse>) =
        get_json(router_for(duties.clone()), "/api/v1/change-duties?report=true").await?;
    let ids: Vec<&str> = responses.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["recent"]);

    // Only the exact string "true" enables the window
    let (_, responses): (_, Vec<ChangeDutyResponse>) =
        get_json(router_for(duties), "/api/v1/change-duties?report=TRUE").await?;
    assert_eq!(responses.len(), 2);
    Ok(())
}

#[tokio::test]
async fn invalid_caregiver_id_with_failing_resolver() -> TestResult {
    let mut resolvers = directory_resolvers();
    resolvers.old_caregiver = Arc::new(FailingNameResolver::new("caregivers"));

    let duty = with_references(
        change_duty("bad", base_time()),
        "client-1",
        "not-a-valid-id",
        &object_id_hex(2),
        "",
    );
    let router = router_with(
        Arc::new(InMemoryChangeDutyStore::with_duties(vec![duty])),
        resolvers,
    );

    let (status, responses): (_, Vec<ChangeDutyResponse>) =
        get_json(router, "/api/v1/change-duties").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(responses[0].old_caregiver_name, "invalid identifier: not-a-valid-id");
    assert_eq!(responses[0].new_caregiver_name, "Carla Dias");
    assert_eq!(responses[0].user_name, "");
    Ok(())
}

#[tokio::test]
async fn empty_store_returns_empty_array() -> TestResult {
    let (status, body) = get(router_for(Vec::new()), "/api/v1/change-duties").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"[]");
    Ok(())
}

// ============================================================================
// FATAL PATHS
// ============================================================================

#[tokio::test]
async fn unavailable_store_is_a_500() -> TestResult {
    let store = InMemoryChangeDutyStore::with_duties(three_duties());
    store.set_unavailable(true);

    let (status, error): (_, ApiError) = get_json(
        router_with(Arc::new(store), directory_resolvers()),
        "/api/v1/change-duties",
    )
    .await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error.code, ErrorCode::DatabaseError);
    Ok(())
}

#[tokio::test]
async fn decode_failure_is_a_500() -> TestResult {
    let (status, error): (_, ApiError) = get_json(
        router_with(Arc::new(CorruptStore), directory_resolvers()),
        "/api/v1/change-duties",
    )
    .await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error.code, ErrorCode::DatabaseError);
    assert!(!error.message.contains("start_time"));
    Ok(())
}

#[tokio::test]
async fn panicking_store_is_caught() -> TestResult {
    let router = router_with(Arc::new(PanickingStore), directory_resolvers());

    let (status, error): (_, ApiError) =
        get_json(router.clone(), "/api/v1/change-duties").await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error.code, ErrorCode::InternalError);

    // The router keeps serving
    let (status, _) = get(router, "/health/ping").await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn panicking_resolver_is_a_500() -> TestResult {
    let mut resolvers = directory_resolvers();
    resolvers.user = Arc::new(PanickingNameResolver);
    let router = router_with(
        Arc::new(InMemoryChangeDutyStore::with_duties(three_duties())),
        resolvers,
    );

    let (status, error): (_, ApiError) = get_json(router, "/api/v1/change-duties").await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error.code, ErrorCode::InternalError);
    Ok(())
}

// ============================================================================
// TIMEOUTS
// ============================================================================

#[tokio::test(start_paused = true)]
async fn slow_resolver_degrades_before_request_timeout() -> TestResult {
    let mut resolvers = directory_resolvers();
    resolvers.client = Arc::new(DelayedNameResolver::new(
        StaticNameResolver::new("clients", [("client-1", "Ana Lima")]),
        Duration::from_secs(3),
    ));
    // No resolver deadline requested, so it lands at half the request timeout
    let config = ApiConfig::default().with_timeouts(None, Duration::from_secs(1));
    let router = app(
        Arc::new(InMemoryChangeDutyStore::with_duties(three_duties())),
        resolvers,
        config,
    );

    let (status, responses): (_, Vec<ChangeDutyResponse>) =
        get_json(router, "/api/v1/change-duties").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(responses.len(), 3);
    for response in &responses {
        assert_eq!(response.client_name, "name lookup failed: client-1");
        assert_eq!(response.old_caregiver_name, "Bruno Reis");
        assert_eq!(response.new_caregiver_name, "Carla Dias");
        assert_eq!(response.user_name, "Dora Melo");
    }
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn hung_store_is_a_json_timeout() -> TestResult {
    let config = ApiConfig::default().with_timeouts(None, Duration::from_secs(1));
    let router = app(Arc::new(HungStore), directory_resolvers(), config);

    let (status, error): (_, ApiError) = get_json(router, "/api/v1/change-duties").await?;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(error.code, ErrorCode::Timeout);
    Ok(())
}

// ============================================================================
// CORS
// ============================================================================

async fn preflight(router: Router, origin: &str) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/change-duties")
        .header(header::ORIGIN, origin)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(Body::empty())?;
    let response = router.oneshot(request).await?;
    let allowed = response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .map(|value| value.to_str().map(str::to_string))
        .transpose()?;
    Ok(allowed)
}

#[tokio::test]
async fn wildcard_origin_passes_preflight() -> TestResult {
    let config = ApiConfig {
        cors_origins: vec!["https://handover.run".to_string(), "*.handover.run".to_string()],
        ..Default::default()
    };
    let router = app(
        Arc::new(InMemoryChangeDutyStore::new()),
        directory_resolvers(),
        config,
    );

    let allowed = preflight(router.clone(), "https://app.handover.run").await?;
    assert_eq!(allowed.as_deref(), Some("https://app.handover.run"));

    let allowed = preflight(router.clone(), "https://handover.run").await?;
    assert_eq!(allowed.as_deref(), Some("https://handover.run"));

    assert_eq!(preflight(router.clone(), "https://evil.com").await?, None);
    assert_eq!(preflight(router, "http://app.handover.run").await?, None);
    Ok(())
}

// ============================================================================
// HEALTH
// ============================================================================

#[tokio::test]
async fn ping_and_liveness() -> TestResult {
    let (status, body) = get(router_for(Vec::new()), "/health/ping").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"pong");

    let (status, health): (_, HealthResponse) =
        get_json(router_for(Vec::new()), "/health/live").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health.status, HealthStatus::Healthy);
    Ok(())
}

#[tokio::test]
async fn readiness_tracks_store_health() -> TestResult {
    let store = InMemoryChangeDutyStore::new();
    let router = router_with(Arc::new(store.clone()), directory_resolvers());

    let (status, health): (_, HealthResponse) = get_json(router.clone(), "/health/ready").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health.status, HealthStatus::Healthy);

    store.set_unavailable(true);
    let (status, health): (_, HealthResponse) = get_json(router, "/health/ready").await?;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(health.status, HealthStatus::Unhealthy);
    let details = health.details.ok_or("missing details")?;
    assert!(details.store.error.is_some());
    Ok(())
}

#[cfg(feature = "openapi")]
#[tokio::test]
async fn openapi_document_is_served() -> TestResult {
    let (status, doc): (_, serde_json::Value) =
        get_json(router_for(Vec::new()), "/openapi.json").await?;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"].get("/api/v1/change-duties").is_some());
    Ok(())
}
