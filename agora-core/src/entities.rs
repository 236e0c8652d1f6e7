//! Persistence records and their drafts.
//!
//! Each record carries the server-assigned `id` and `created_at` alongside its
//! declared fields. Drafts carry only what a client supplies.

use crate::entity::{Entity, EntityKind, RecordId, Timestamp};
use serde::{Deserialize, Serialize};

/// Implement [`Entity`] for a record keyed by one of its own fields.
///
/// ```ignore
/// impl_entity!(Agent, NewAgent, EntityKind::Agent, name: String);
/// impl_entity!(Ethics, NewEthics, EntityKind::Ethics, by id);
/// ```
macro_rules! impl_entity {
    ($record:ty, $draft:ty, $kind:expr, $key:ident: $key_ty:ty) => {
        impl Entity for $record {
            type Key = $key_ty;
            type Draft = $draft;

            const KIND: EntityKind = $kind;

            fn id(&self) -> RecordId {
                self.id
            }

            fn key(&self) -> &Self::Key {
                &self.$key
            }
        }
    };
    ($record:ty, $draft:ty, $kind:expr, by id) => {
        impl Entity for $record {
            type Key = RecordId;
            type Draft = $draft;

            const KIND: EntityKind = $kind;

            fn id(&self) -> RecordId {
                self.id
            }

            fn key(&self) -> &Self::Key {
                &self.id
            }
        }
    };
}

// ============================================================================
// AGENTS, ROLES, TASKS, GROUPS
// ============================================================================

/// An agent bound to a model, optionally holding a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: RecordId,
    pub name: String,
    pub model: String,
    /// Name of the role this agent holds. Cleared when the role is deleted.
    pub role: Option<String>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAgent {
    pub name: String,
    pub model: String,
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RecordId,
    pub name: String,
    pub description: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRole {
    pub name: String,
    pub description: String,
}

/// A named action, optionally owned by an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: RecordId,
    pub name: String,
    pub action: String,
    /// Name of the owning agent. Cleared when the agent is deleted.
    pub agent: Option<String>,
    pub created_at: Timestamp,
}

/// Task draft. Also the full replacement payload for task updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub name: String,
    pub action: String,
    pub agent: Option<String>,
}

/// A named group: an ordered member list and an ordered set of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: RecordId,
    pub name: String,
    pub members: Vec<String>,
    /// Task names, in the order they were attached. Deleting a task drops it here.
    pub tasks: Vec<String>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGroup {
    pub name: String,
    pub members: Vec<String>,
    pub tasks: Vec<String>,
}

// ============================================================================
// NAMED TEXT RECORDS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Influence {
    pub id: RecordId,
    pub name: String,
    pub effect: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInfluence {
    pub name: String,
    pub effect: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub id: RecordId,
    pub name: String,
    pub description: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStage {
    pub name: String,
    pub description: String,
}

// ============================================================================
// TITLED CONTENT RECORDS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct News {
    pub id: RecordId,
    pub title: String,
    pub content: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNews {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: RecordId,
    pub title: String,
    pub content: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecommendation {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Training {
    pub id: RecordId,
    pub title: String,
    pub content: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTraining {
    pub title: String,
    pub content: String,
}

/// Feedback left by a user. One record per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: RecordId,
    pub user: String,
    pub content: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFeedback {
    pub user: String,
    pub content: String,
}

// ============================================================================
// ID-KEYED RECORDS
// ============================================================================

/// An ordered set of ethical principles. Stored as one parent row plus one
/// child row per principle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ethics {
    pub id: RecordId,
    pub principles: Vec<String>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEthics {
    pub principles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scaling {
    pub id: RecordId,
    pub strategy: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewScaling {
    pub strategy: String,
}

impl_entity!(Agent, NewAgent, EntityKind::Agent, name: String);
impl_entity!(Role, NewRole, EntityKind::Role, name: String);
impl_entity!(Task, NewTask, EntityKind::Task, name: String);
impl_entity!(Group, NewGroup, EntityKind::Group, name: String);
impl_entity!(Influence, NewInfluence, EntityKind::Influence, name: String);
impl_entity!(Stage, NewStage, EntityKind::Stage, name: String);
impl_entity!(News, NewNews, EntityKind::News, title: String);
impl_entity!(Recommendation, NewRecommendation, EntityKind::Recommendation, title: String);
impl_entity!(Training, NewTraining, EntityKind::Training, title: String);
impl_entity!(Feedback, NewFeedback, EntityKind::Feedback, user: String);
impl_entity!(Ethics, NewEthics, EntityKind::Ethics, by id);
impl_entity!(Scaling, NewScaling, EntityKind::Scaling, by id);
