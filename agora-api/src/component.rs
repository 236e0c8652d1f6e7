//! Component trait for generic CRUD operations.
//!
//! Every entity's wire record implements [`Component`], which ties it to its
//! persistence record and its create payload. [`crate::db::DbClient`] and the
//! handlers in [`crate::routes::generic`] are written once against this trait
//! and instantiated per entity.

use crate::error::ApiError;
use crate::validation::Validate;
use agora_core::{Entity, EntityKind};
use serde::{de::DeserializeOwned, Serialize};

// ============================================================================
// COMPONENT TRAIT
// ============================================================================

/// Wire record for one entity kind.
///
/// # Type Parameters
///
/// - `Record`: the persistence record this is mapped from
/// - `Create`: the request body accepted by `POST`; converts into the
///   record's draft once validated
pub trait Component: Serialize + From<Self::Record> + Send + Sync + 'static {
    type Record: Entity;

    type Create: DeserializeOwned + Validate + Into<<Self::Record as Entity>::Draft> + Send + 'static;

    /// The entity kind, used in messages and logs.
    const KIND: EntityKind = <Self::Record as Entity>::KIND;

    /// Create a not-found error for this entity type.
    fn not_found_error() -> ApiError {
        ApiError::entity_not_found(Self::KIND)
    }
}

/// Implement [`Component`] for a wire record.
///
/// ```ignore
/// impl_component!(AgentResponse, record: Agent, create: CreateAgentRequest);
/// ```
macro_rules! impl_component {
    ($response:ty, record: $record:ty, create: $create:ty) => {
        impl $crate::component::Component for $response {
            type Record = $record;
            type Create = $create;
        }
    };
}

pub(crate) use impl_component;
