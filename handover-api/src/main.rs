//! HANDOVER API Server Entry Point
//!
//! Bootstraps configuration, connects the PostgreSQL store and name
//! directories, and starts the Axum HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use handover_api::constants::{DEFAULT_API_PORT, DEFAULT_BIND_HOST};
use handover_api::telemetry::{init_tracing, TelemetryConfig};
use handover_api::{
    create_api_router, ApiConfig, ApiError, ApiResult, AppState, DbClient, DbConfig, Directory,
    PgChangeDutyStore, PgNameResolver,
};
use handover_enrich::{resolvers_with_shared_caregiver, Enricher};

#[tokio::main]
async fn main() -> ApiResult<()> {
    let telemetry_config = TelemetryConfig::default();
    init_tracing(&telemetry_config)?;

    let api_config = ApiConfig::from_env();
    let db_config = DbConfig::from_env();
    let db = DbClient::from_config(&db_config)?;

    let resolvers = resolvers_with_shared_caregiver(
        Arc::new(PgNameResolver::new(db.clone(), Directory::Clients)),
        Arc::new(PgNameResolver::new(db.clone(), Directory::Caregivers)),
        Arc::new(PgNameResolver::new(db.clone(), Directory::Users)),
    );
    let enricher =
        Enricher::new(resolvers).with_resolver_deadline(Some(api_config.resolver_timeout));
    let state = AppState::new(Arc::new(PgChangeDutyStore::new(db)), enricher);

    let app = create_api_router(state, &api_config);

    let addr = resolve_bind_addr()?;
    tracing::info!(
        %addr,
        resolver_timeout = ?api_config.resolver_timeout,
        pool_size = db_config.max_size,
        "Starting HANDOVER API server"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

fn resolve_bind_addr() -> ApiResult<SocketAddr> {
    let host = std::env::var("HANDOVER_API_BIND").unwrap_or_else(|_| DEFAULT_BIND_HOST.to_string());
    let port_str = std::env::var("PORT")
        .ok()
        .or_else(|| std::env::var("HANDOVER_API_PORT").ok())
        .unwrap_or_else(|| DEFAULT_API_PORT.to_string());
    let port = port_str.parse::<u16>().map_err(|_| {
        ApiError::invalid_input(format!("Invalid port value: {}", port_str))
    })?;

    let addr = format!("{}:{}", host, port);
    addr.parse::<SocketAddr>().map_err(|e| {
        ApiError::invalid_input(format!("Invalid bind address {}: {}", addr, e))
    })
}
