//! Agora Core - Entity Records
//!
//! Persistence-side data structures shared by every other crate: the records
//! the store hands back, the drafts it accepts, and the error taxonomy.
//! Wire formats live in `agora-api`; nothing here knows about HTTP.

mod entities;
mod entity;
mod error;

pub use entities::*;
pub use entity::{Entity, EntityKind, RecordId, Timestamp};
pub use error::{
    AgoraError, AgoraResult, ConfigError, NlpError, StorageError, ValidationError,
};
