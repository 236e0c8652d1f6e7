//! Entity identity: the kind discriminator and the trait every record implements.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-assigned row identifier (`BIGSERIAL` in Postgres).
pub type RecordId = i64;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Entity kind discriminator, used in errors and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Agent,
    Role,
    Task,
    Group,
    Influence,
    Stage,
    News,
    Recommendation,
    Training,
    Feedback,
    Ethics,
    Scaling,
}

impl EntityKind {
    pub const ALL: [EntityKind; 12] = [
        EntityKind::Agent,
        EntityKind::Role,
        EntityKind::Task,
        EntityKind::Group,
        EntityKind::Influence,
        EntityKind::Stage,
        EntityKind::News,
        EntityKind::Recommendation,
        EntityKind::Training,
        EntityKind::Feedback,
        EntityKind::Ethics,
        EntityKind::Scaling,
    ];

    /// Human-facing name, as used in "<Entity> not found".
    pub fn display_name(self) -> &'static str {
        match self {
            EntityKind::Agent => "Agent",
            EntityKind::Role => "Role",
            EntityKind::Task => "Task",
            EntityKind::Group => "Group",
            EntityKind::Influence => "Influence",
            EntityKind::Stage => "Stage",
            EntityKind::News => "News",
            EntityKind::Recommendation => "Recommendation",
            EntityKind::Training => "Training",
            EntityKind::Feedback => "Feedback",
            EntityKind::Ethics => "Ethics",
            EntityKind::Scaling => "Scaling",
        }
    }

    /// Backing table name.
    pub fn table(self) -> &'static str {
        match self {
            EntityKind::Agent => "agents",
            EntityKind::Role => "roles",
            EntityKind::Task => "tasks",
            EntityKind::Group => "groups",
            EntityKind::Influence => "influences",
            EntityKind::Stage => "stages",
            EntityKind::News => "news",
            EntityKind::Recommendation => "recommendations",
            EntityKind::Training => "training",
            EntityKind::Feedback => "feedback",
            EntityKind::Ethics => "ethics",
            EntityKind::Scaling => "scaling",
        }
    }

    /// Name of the field that addresses a record of this kind.
    pub fn key_field(self) -> &'static str {
        match self {
            EntityKind::News
            | EntityKind::Recommendation
            | EntityKind::Training => "title",
            EntityKind::Feedback => "user",
            EntityKind::Ethics | EntityKind::Scaling => "id",
            _ => "name",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A persisted record addressed by a natural key.
///
/// `Draft` is the validated, not-yet-persisted form accepted by a repository's
/// `create`. `Key` is the natural key (a name, title or user) or, for kinds
/// without one, the server-assigned id.
pub trait Entity: Clone + fmt::Debug + Send + Sync + 'static {
    type Key: Clone + fmt::Debug + fmt::Display + PartialEq + Send + Sync + 'static;
    type Draft: Clone + fmt::Debug + Send + Sync + 'static;

    const KIND: EntityKind;

    fn id(&self) -> RecordId;

    fn key(&self) -> &Self::Key;
}
