//! Database Connection Pool Module
//!
//! PostgreSQL connection pooling using deadpool-postgres, plus the
//! PostgreSQL-backed primary store and name directories used in production.

use async_trait::async_trait;
use deadpool_postgres::{Config, ManagerConfig, Pool, RecyclingMethod, Runtime};
use handover_core::{
    ChangeDuty, ChangeDutyQuery, NameMapping, NameResolver, ResolveError, ResolveResult,
    StorageError, Timestamp,
};
use handover_storage::{ChangeDutyStore, StorageResult};
use std::time::Duration;
use tokio_postgres::{NoTls, Row};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

// ============================================================================
// CONNECTION POOL CONFIGURATION
// ============================================================================

/// Database connection pool configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// PostgreSQL host
    pub host: String,
    /// PostgreSQL port
    pub port: u16,
    /// Database name
    pub dbname: String,
    /// Database user
    pub user: String,
    /// Database password
    pub password: String,
    /// Maximum pool size
    pub max_size: usize,
    /// Wait/create/recycle timeout for pooled connections
    pub timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "handover".to_string(),
            user: "postgres".to_string(),
            password: "".to_string(),
            max_size: 16,
            timeout: Duration::from_secs(30),
        }
    }
}

impl DbConfig {
    /// Create a new database configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("HANDOVER_DB_HOST").unwrap_or(defaults.host),
            port: std::env::var("HANDOVER_DB_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            dbname: std::env::var("HANDOVER_DB_NAME").unwrap_or(defaults.dbname),
            user: std::env::var("HANDOVER_DB_USER").unwrap_or(defaults.user),
            password: std::env::var("HANDOVER_DB_PASSWORD").unwrap_or_default(),
            max_size: std::env::var("HANDOVER_DB_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_size),
            timeout: std::env::var("HANDOVER_DB_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }

    /// Create a connection pool from this configuration.
    pub fn create_pool(&self) -> ApiResult<Pool> {
        let mut cfg = Config::new();
        cfg.host = Some(self.host.clone());
        cfg.port = Some(self.port);
        cfg.dbname = Some(self.dbname.clone());
        cfg.user = Some(self.user.clone());
        cfg.password = Some(self.password.clone());

        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });

        let mut pool_config = deadpool_postgres::PoolConfig::new(self.max_size);
        pool_config.timeouts.wait = Some(self.timeout);
        pool_config.timeouts.create = Some(self.timeout);
        pool_config.timeouts.recycle = Some(self.timeout);
        cfg.pool = Some(pool_config);

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| ApiError::database_error(format!("Failed to create pool: {}", e)))?;

        Ok(pool)
    }
}

// ============================================================================
// DATABASE CLIENT WRAPPER
// ============================================================================

/// Database client that wraps a connection pool.
#[derive(Clone)]
pub struct DbClient {
    pool: Pool,
}

impl DbClient {
    /// Create a new database client with the given pool.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Create a new database client from configuration.
    pub fn from_config(config: &DbConfig) -> ApiResult<Self> {
        let pool = config.create_pool()?;
        Ok(Self::new(pool))
    }

    /// Get a connection from the pool.
    pub async fn get_conn(&self) -> ApiResult<deadpool_postgres::Object> {
        self.pool.get().await.map_err(ApiError::from)
    }

    /// Round-trip a trivial query.
    pub async fn health_check(&self) -> ApiResult<()> {
        let conn = self.get_conn().await?;
        conn.query_one("SELECT 1", &[]).await?;
        Ok(())
    }
}

// ============================================================================
// CHANGE-DUTY STORE
// ============================================================================

const CHANGE_DUTY_PAGE_SQL: &str = "\
    SELECT id, client_id, old_caregiver_id, new_caregiver_id, user_id, \
           start_time, end_time, duty_situation, duty_description, \
           created_at, updated_at, uuid \
    FROM change_duties \
    WHERE ($1::timestamptz IS NULL OR created_at >= $1) \
    ORDER BY start_time DESC \
    OFFSET $2 LIMIT $3";

/// PostgreSQL-backed [`ChangeDutyStore`].
#[derive(Clone)]
pub struct PgChangeDutyStore {
    db: DbClient,
}

impl PgChangeDutyStore {
    pub fn new(db: DbClient) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ChangeDutyStore for PgChangeDutyStore {
    async fn find_page(&self, query: &ChangeDutyQuery) -> StorageResult<Vec<ChangeDuty>> {
        let conn = self.db.pool.get().await.map_err(|e| StorageError::Unavailable {
            reason: e.to_string(),
        })?;

        let rows = conn
            .query(
                CHANGE_DUTY_PAGE_SQL,
                &[&query.created_since, &query.skip, &query.limit],
            )
            .await
            .map_err(|e| StorageError::QueryFailed {
                reason: e.to_string(),
            })?;

        tracing::debug!(rows = rows.len(), skip = query.skip, limit = query.limit, "Fetched change duties");
        rows.iter().map(change_duty_from_row).collect()
    }

    async fn health_check(&self) -> StorageResult<bool> {
        match self.db.health_check().await {
            Ok(()) => Ok(true),
            Err(e) => Err(StorageError::Unavailable { reason: e.message }),
        }
    }
}

fn decode_failed(column: &str, err: tokio_postgres::Error) -> StorageError {
    StorageError::DecodeFailed {
        entity: "change_duty".to_string(),
        reason: format!("column {}: {}", column, err),
    }
}

fn text_column(row: &Row, column: &str) -> StorageResult<String> {
    row.try_get::<_, Option<String>>(column)
        .map(Option::unwrap_or_default)
        .map_err(|e| decode_failed(column, e))
}

fn time_column(row: &Row, column: &str) -> StorageResult<Timestamp> {
    row.try_get::<_, Timestamp>(column)
        .map_err(|e| decode_failed(column, e))
}

/// Decode one row. Nullable text columns become empty strings.
fn change_duty_from_row(row: &Row) -> StorageResult<ChangeDuty> {
    Ok(ChangeDuty {
        id: row
            .try_get::<_, String>("id")
            .map_err(|e| decode_failed("id", e))?,
        client_id: text_column(row, "client_id")?,
        old_caregiver_id: text_column(row, "old_caregiver_id")?,
        new_caregiver_id: text_column(row, "new_caregiver_id")?,
        user_id: text_column(row, "user_id")?,
        start_time: time_column(row, "start_time")?,
        end_time: time_column(row, "end_time")?,
        duty_situation: text_column(row, "duty_situation")?,
        duty_description: text_column(row, "duty_description")?,
        created_at: time_column(row, "created_at")?,
        updated_at: time_column(row, "updated_at")?,
        uuid: row
            .try_get::<_, Uuid>("uuid")
            .map_err(|e| decode_failed("uuid", e))?,
    })
}

// ============================================================================
// NAME DIRECTORIES
// ============================================================================

/// Directory tables that map reference ids to display names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directory {
    Clients,
    Caregivers,
    Users,
}

impl Directory {
    pub fn table(self) -> &'static str {
        match self {
            Directory::Clients => "clients",
            Directory::Caregivers => "caregivers",
            Directory::Users => "users",
        }
    }

    fn lookup_sql(self) -> &'static str {
        match self {
            Directory::Clients => "SELECT id, name FROM clients WHERE id = ANY($1)",
            Directory::Caregivers => "SELECT id, name FROM caregivers WHERE id = ANY($1)",
            Directory::Users => "SELECT id, name FROM users WHERE id = ANY($1)",
        }
    }
}

/// PostgreSQL-backed [`NameResolver`] for one directory table.
#[derive(Clone)]
pub struct PgNameResolver {
    db: DbClient,
    directory: Directory,
}

impl PgNameResolver {
    pub fn new(db: DbClient, directory: Directory) -> Self {
        Self { db, directory }
    }
}

#[async_trait]
impl NameResolver for PgNameResolver {
    fn name(&self) -> &str {
        self.directory.table()
    }

    async fn resolve_names(&self, ids: &[String]) -> ResolveResult<NameMapping> {
        if ids.is_empty() {
            return Ok(NameMapping::new());
        }

        let mut unique = ids.to_vec();
        unique.sort_unstable();
        unique.dedup();

        let conn = self.db.pool.get().await.map_err(|e| ResolveError::Unavailable {
            resolver: self.name().to_string(),
            reason: e.to_string(),
        })?;

        let query_failed = |reason: String| ResolveError::QueryFailed {
            resolver: self.name().to_string(),
            reason,
        };

        let rows = conn
            .query(self.directory.lookup_sql(), &[&unique])
            .await
            .map_err(|e| query_failed(e.to_string()))?;

        rows.iter()
            .map(|row| {
                let id: String = row.try_get("id").map_err(|e| query_failed(e.to_string()))?;
                let name: Option<String> =
                    row.try_get("name").map_err(|e| query_failed(e.to_string()))?;
                Ok((id, name.unwrap_or_default()))
            })
            .collect()
    }
}
