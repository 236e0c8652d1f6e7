//! Agora Storage - Repository Contract and Backends
//!
//! Defines the per-entity repository contract and its two implementations:
//! [`PgStore`], the production gateway over a deadpool-postgres pool, and
//! [`MemoryStore`], an in-process store with the same semantics used for
//! tests and database-less development.

pub mod memory;
pub mod pg;

pub use memory::MemoryStore;
pub use pg::{DbConfig, PgStore};

use agora_core::{
    Agent, AgoraResult, Entity, Ethics, Feedback, Group, Influence, News, Recommendation, Role,
    Scaling, Stage, Task, Training,
};
use async_trait::async_trait;

// ============================================================================
// REPOSITORY CONTRACT
// ============================================================================

/// Create/read/delete/list against one entity kind.
///
/// Absence is never an error: `get_by_key` returns `Ok(None)` and
/// `delete_by_key` returns `Ok(false)`. `Err` is reserved for failures of
/// the backing store, and a failed `create` leaves no partial state behind.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// Persist a validated draft and return the stored record.
    async fn create(&self, draft: E::Draft) -> AgoraResult<E>;

    /// First record matching the key, if any.
    async fn get_by_key(&self, key: &E::Key) -> AgoraResult<Option<E>>;

    /// Remove the record matching the key. Returns whether a record was removed.
    async fn delete_by_key(&self, key: &E::Key) -> AgoraResult<bool>;

    /// Every record, in insertion order.
    async fn list_all(&self) -> AgoraResult<Vec<E>>;
}

/// Replace-all-fields update for kinds that support it.
#[async_trait]
pub trait UpdateRepository<E: Entity>: Repository<E> {
    /// Replace the record at `key` with `draft`. `Ok(None)` if `key` is absent.
    async fn update_by_key(&self, key: &E::Key, draft: E::Draft) -> AgoraResult<Option<E>>;
}

/// Readiness probe for the backing store.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn ping(&self) -> AgoraResult<()>;

    /// Short backend label for logs and health output.
    fn backend(&self) -> &'static str;
}

/// Everything the HTTP layer needs from a backend, as one object-safe trait.
pub trait Store:
    HealthCheck
    + Repository<Agent>
    + Repository<Role>
    + UpdateRepository<Task>
    + Repository<Group>
    + Repository<Influence>
    + Repository<Stage>
    + Repository<News>
    + Repository<Recommendation>
    + Repository<Training>
    + Repository<Feedback>
    + Repository<Ethics>
    + Repository<Scaling>
{
}

impl<T> Store for T where
    T: HealthCheck
        + Repository<Agent>
        + Repository<Role>
        + UpdateRepository<Task>
        + Repository<Group>
        + Repository<Influence>
        + Repository<Stage>
        + Repository<News>
        + Repository<Recommendation>
        + Repository<Training>
        + Repository<Feedback>
        + Repository<Ethics>
        + Repository<Scaling>
{
}
