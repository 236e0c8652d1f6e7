//! PostgreSQL Persistence Gateway
//!
//! Connection pooling via deadpool-postgres. Each repository call checks out
//! one pooled client for its own duration; the `Object` guard returns it to
//! the pool when dropped, whichever way the call exits. Writes run inside a
//! transaction that is committed on success and rolled back on failure.

mod entities;

pub use entities::{FromRow, PgEntity};

use crate::{HealthCheck, Repository, UpdateRepository};
use agora_core::{AgoraError, AgoraResult, EntityKind, NewTask, StorageError, Task};
use async_trait::async_trait;
use deadpool_postgres::{
    Config, ManagerConfig, Object, Pool, PoolConfig, RecyclingMethod, Runtime, Transaction,
};
use std::time::Duration;
use tokio_postgres::error::SqlState;
use tokio_postgres::NoTls;

/// Schema applied by [`PgStore::migrate`].
pub const SCHEMA: &str = include_str!("schema.sql");

// ============================================================================
// CONNECTION POOL CONFIGURATION
// ============================================================================

/// Database connection pool configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Full connection string. Takes precedence over the individual parts.
    pub url: Option<String>,
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
    /// How long to wait for a pooled connection
    pub timeout: Duration,
    /// Apply [`SCHEMA`] at startup
    pub auto_migrate: bool,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            dbname: "agora".to_string(),
            user: "postgres".to_string(),
            password: "".to_string(),
            max_size: 16,
            timeout: Duration::from_secs(5),
            auto_migrate: true,
        }
    }
}

impl DbConfig {
    /// Create a new database configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: std::env::var("DATABASE_URL").ok().filter(|s| !s.trim().is_empty()),
            host: std::env::var("AGORA_DB_HOST").unwrap_or(defaults.host),
            port: std::env::var("AGORA_DB_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            dbname: std::env::var("AGORA_DB_NAME").unwrap_or(defaults.dbname),
            user: std::env::var("AGORA_DB_USER").unwrap_or(defaults.user),
            password: std::env::var("AGORA_DB_PASSWORD").unwrap_or_default(),
            max_size: std::env::var("AGORA_DB_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_size),
            timeout: std::env::var("AGORA_DB_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            auto_migrate: std::env::var("AGORA_DB_AUTO_MIGRATE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.auto_migrate),
        }
    }

    /// Create a connection pool from this configuration.
    pub fn create_pool(&self) -> AgoraResult<Pool> {
        let mut cfg = Config::new();
        match &self.url {
            Some(url) => cfg.url = Some(url.clone()),
            None => {
                cfg.host = Some(self.host.clone());
                cfg.port = Some(self.port);
                cfg.dbname = Some(self.dbname.clone());
                cfg.user = Some(self.user.clone());
                cfg.password = Some(self.password.clone());
            }
        }

        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });
        let mut pool = PoolConfig::new(self.max_size);
        pool.timeouts.wait = Some(self.timeout);
        pool.timeouts.create = Some(self.timeout);
        pool.timeouts.recycle = Some(self.timeout);
        cfg.pool = Some(pool);

        cfg.create_pool(Some(Runtime::Tokio1), NoTls).map_err(|e| {
            StorageError::Pool {
                reason: format!("Failed to create pool: {}", e),
            }
            .into()
        })
    }
}

// ============================================================================
// ERROR CLASSIFICATION
// ============================================================================

/// Map a driver error to a storage error, keeping the server's SQLSTATE and
/// message when there is one.
pub(crate) fn db_error(err: tokio_postgres::Error) -> AgoraError {
    let reason = match err.as_db_error() {
        Some(db) => format!("{}: {}", db.code().code(), db.message()),
        None => err.to_string(),
    };
    StorageError::Database { reason }.into()
}

/// Like [`db_error`], but turns a unique violation into a conflict on `key`.
pub(crate) fn write_error(err: tokio_postgres::Error, kind: EntityKind, key: &str) -> AgoraError {
    if err.code() == Some(&SqlState::UNIQUE_VIOLATION) {
        return StorageError::Conflict {
            kind,
            key: key.to_string(),
        }
        .into();
    }
    db_error(err)
}

// ============================================================================
// STORE
// ============================================================================

/// Repository backend over a PostgreSQL pool.
#[derive(Clone)]
pub struct PgStore {
    pool: Pool,
}

impl PgStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Create a new store from configuration.
    pub fn from_config(config: &DbConfig) -> AgoraResult<Self> {
        let pool = config.create_pool()?;
        Ok(Self::new(pool))
    }

    /// Get the current pool size for observability.
    pub fn pool_size(&self) -> usize {
        self.pool.status().size
    }

    /// Check out a scoped session. Returned to the pool on drop.
    async fn session(&self) -> AgoraResult<Object> {
        self.pool.get().await.map_err(|e| {
            StorageError::Pool {
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Create every table that does not exist yet.
    pub async fn migrate(&self) -> AgoraResult<()> {
        let session = self.session().await?;
        session.batch_execute(SCHEMA).await.map_err(db_error)?;
        tracing::info!("database schema applied");
        Ok(())
    }
}

/// Commit `tx` if `outcome` succeeded, otherwise roll it back and hand the
/// original error on.
async fn settle<T>(tx: Transaction<'_>, outcome: AgoraResult<T>, kind: EntityKind) -> AgoraResult<T> {
    match outcome {
        Ok(value) => {
            tx.commit().await.map_err(|e| {
                AgoraError::from(StorageError::TransactionFailed {
                    reason: e.to_string(),
                })
            })?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!(
                    entity = %kind,
                    error = %rollback_err,
                    "rollback failed; the pooled connection discards the transaction"
                );
            }
            Err(err)
        }
    }
}

#[async_trait]
impl<E: PgEntity> Repository<E> for PgStore {
    async fn create(&self, draft: E::Draft) -> AgoraResult<E> {
        let mut session = self.session().await?;
        let tx = session.transaction().await.map_err(db_error)?;
        let outcome = E::insert(&tx, &draft).await;
        settle(tx, outcome, E::KIND).await
    }

    async fn get_by_key(&self, key: &E::Key) -> AgoraResult<Option<E>> {
        let session = self.session().await?;
        E::fetch(&session, key).await
    }

    async fn delete_by_key(&self, key: &E::Key) -> AgoraResult<bool> {
        let mut session = self.session().await?;
        let tx = session.transaction().await.map_err(db_error)?;
        let outcome = E::remove(&tx, key).await;
        settle(tx, outcome, E::KIND).await
    }

    async fn list_all(&self) -> AgoraResult<Vec<E>> {
        let session = self.session().await?;
        E::fetch_all(&session).await
    }
}

#[async_trait]
impl UpdateRepository<Task> for PgStore {
    async fn update_by_key(&self, key: &String, draft: NewTask) -> AgoraResult<Option<Task>> {
        let mut session = self.session().await?;
        let tx = session.transaction().await.map_err(db_error)?;
        let outcome = entities::update_task(&tx, key, &draft).await;
        settle(tx, outcome, EntityKind::Task).await
    }
}

#[async_trait]
impl HealthCheck for PgStore {
    async fn ping(&self) -> AgoraResult<()> {
        let session = self.session().await?;
        session.simple_query("SELECT 1").await.map_err(db_error)?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
