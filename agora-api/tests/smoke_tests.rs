#![cfg(feature = "db-tests")]
//! End-to-end smoke tests against PostgreSQL.
//!
//! Needs a reachable database configured through the `AGORA_DB_*` variables.

use std::sync::Arc;

use agora_api::{ApiResult, Component, DbClient};
use agora_api::types::{AgentResponse, CreateAgentRequest, CreateEthicsRequest, CreateRoleRequest, EthicsResponse, RoleResponse};
use agora_storage::{DbConfig, PgStore};
use uuid::Uuid;

async fn test_db() -> ApiResult<DbClient> {
    let store = PgStore::from_config(&DbConfig::from_env())?;
    store.migrate().await?;
    Ok(DbClient::new(Arc::new(store)))
}

fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::now_v7())
}

#[tokio::test]
async fn smoke_test_storage_is_reachable() -> ApiResult<()> {
    let db = test_db().await?;
    db.health_check().await?;
    assert_eq!(db.backend(), "postgres");
    Ok(())
}

#[tokio::test]
async fn smoke_test_agent_and_role_chain() -> ApiResult<()> {
    let db = test_db().await?;
    let role_name = unique("role");
    let agent_name = unique("agent");

    let role: RoleResponse = db
        .create::<RoleResponse>(CreateRoleRequest {
            name: role_name.clone(),
            description: "smoke".to_string(),
        })
        .await?;
    assert_eq!(role.name, role_name);

    let agent: AgentResponse = db
        .create::<AgentResponse>(CreateAgentRequest {
            name: agent_name.clone(),
            model: "m1".to_string(),
            role: Some(role_name.clone()),
        })
        .await?;
    assert_eq!(agent.role.as_deref(), Some(role_name.as_str()));

    assert!(db.delete::<RoleResponse>(&role_name).await?);
    let agent = db.get::<AgentResponse>(&agent_name).await?;
    assert_eq!(agent.and_then(|a| a.role), None);

    assert!(db.delete::<AgentResponse>(&agent_name).await?);
    assert!(db.get::<AgentResponse>(&agent_name).await?.is_none());
    assert_eq!(AgentResponse::KIND.to_string(), "Agent");
    Ok(())
}

#[tokio::test]
async fn smoke_test_ethics_principles_keep_order() -> ApiResult<()> {
    let db = test_db().await?;
    let principles = vec!["transparency".to_string(), "fairness".to_string(), "privacy".to_string()];

    let ethics: EthicsResponse = db
        .create::<EthicsResponse>(CreateEthicsRequest {
            principles: principles.clone(),
        })
        .await?;
    let fetched = db.get::<EthicsResponse>(&ethics.id).await?;
    assert_eq!(fetched.map(|e| e.principles), Some(principles));

    assert!(db.delete::<EthicsResponse>(&ethics.id).await?);
    Ok(())
}
