//! Database access for the API layer.
//!
//! [`DbClient`] wraps whichever [`Store`] backend was configured and exposes
//! generic CRUD over [`Component`] types, mapping persistence records to wire
//! records on the way out.

use crate::component::Component;
use crate::error::ApiResult;
use agora_core::{AgoraResult, Entity};
use agora_storage::{Repository, Store, UpdateRepository};
use std::sync::Arc;

/// Handle to the configured store. Cheap to clone.
#[derive(Clone)]
pub struct DbClient {
    store: Arc<dyn Store>,
}

impl DbClient {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Backend label for logs and health output.
    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    pub async fn health_check(&self) -> AgoraResult<()> {
        self.store.ping().await
    }

    // ========================================================================
    // GENERIC CRUD
    // ========================================================================

    /// Persist a validated create request.
    pub async fn create<C>(&self, req: C::Create) -> ApiResult<C>
    where
        C: Component,
        dyn Store: Repository<C::Record>,
    {
        let record = Repository::<C::Record>::create(self.store.as_ref(), req.into()).await?;
        tracing::debug!(entity = %C::KIND, key = %record.key(), "created");
        Ok(C::from(record))
    }

    /// Look up by natural key. `Ok(None)` when absent.
    pub async fn get<C>(&self, key: &<C::Record as Entity>::Key) -> ApiResult<Option<C>>
    where
        C: Component,
        dyn Store: Repository<C::Record>,
    {
        let record = Repository::<C::Record>::get_by_key(self.store.as_ref(), key).await?;
        Ok(record.map(C::from))
    }

    /// Delete by natural key. Returns whether a record was removed.
    pub async fn delete<C>(&self, key: &<C::Record as Entity>::Key) -> ApiResult<bool>
    where
        C: Component,
        dyn Store: Repository<C::Record>,
    {
        let removed = Repository::<C::Record>::delete_by_key(self.store.as_ref(), key).await?;
        if removed {
            tracing::debug!(entity = %C::KIND, key = %key, "deleted");
        }
        Ok(removed)
    }

    pub async fn list<C>(&self) -> ApiResult<Vec<C>>
    where
        C: Component,
        dyn Store: Repository<C::Record>,
    {
        let records = Repository::<C::Record>::list_all(self.store.as_ref()).await?;
        Ok(records.into_iter().map(C::from).collect())
    }

    /// Replace every field of the record at `key`. `Ok(None)` when absent.
    pub async fn update<C>(
        &self,
        key: &<C::Record as Entity>::Key,
        req: C::Create,
    ) -> ApiResult<Option<C>>
    where
        C: Component,
        dyn Store: UpdateRepository<C::Record>,
    {
        let record =
            UpdateRepository::<C::Record>::update_by_key(self.store.as_ref(), key, req.into())
                .await?;
        Ok(record.map(C::from))
    }
}

impl std::fmt::Debug for DbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbClient")
            .field("backend", &self.backend())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AgentResponse, CreateAgentRequest, CreateTaskRequest, TaskResponse};
    use agora_storage::MemoryStore;

    fn client() -> DbClient {
        DbClient::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_create_then_get_returns_wire_record() {
        let db = client();
        let created = db
            .create::<AgentResponse>(CreateAgentRequest {
                name: "a1".to_string(),
                model: "m1".to_string(),
                role: None,
            })
            .await
            .unwrap();
        let fetched = db.get::<AgentResponse>(&"a1".to_string()).await.unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn test_delete_absent_is_false() {
        let db = client();
        assert!(!db.delete::<AgentResponse>(&"ghost".to_string()).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_absent_is_none() {
        let db = client();
        let updated = db
            .update::<TaskResponse>(
                &"ghost".to_string(),
                CreateTaskRequest {
                    name: "ghost".to_string(),
                    action: "haunt".to_string(),
                    agent: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated, None);
        assert_eq!(db.backend(), "memory");
    }
}
