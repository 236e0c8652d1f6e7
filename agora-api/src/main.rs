//! Agora API Server Entry Point
//!
//! Loads `.env`, reads configuration, opens the configured store and
//! starts the Axum HTTP server.

use std::sync::Arc;

use agora_api::telemetry::init_logging;
use agora_api::{create_api_router, AppConfig, AppState, DbClient, StorageBackend};
use agora_core::{AgoraError, AgoraResult, ConfigError};
use agora_nlp::NlpService;
use agora_storage::{MemoryStore, PgStore, Store};

#[tokio::main]
async fn main() -> AgoraResult<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    let _log_guard = init_logging(&config.log)?;

    let store = open_store(&config).await?;
    let db = DbClient::new(store);
    let nlp = NlpService::from_config(&config.nlp)?;

    let state = AppState::new(db, nlp, config.auth.clone()).with_project_name(&config.project_name);
    let app = create_api_router(state, &config);

    tracing::info!(addr = %config.bind, prefix = %config.api_prefix, "Starting Agora API server");

    let listener = tokio::net::TcpListener::bind(config.bind).await.map_err(|e| {
        AgoraError::Config(ConfigError::InvalidValue {
            field: "AGORA_BIND".to_string(),
            value: config.bind.to_string(),
            reason: format!("failed to bind: {}", e),
        })
    })?;

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());
    if let Err(e) = server.await {
        tracing::error!(error = %e, "Server error");
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn open_store(config: &AppConfig) -> AgoraResult<Arc<dyn Store>> {
    match config.storage {
        StorageBackend::Postgres => {
            let store = PgStore::from_config(&config.db)?;
            if config.db.auto_migrate {
                store.migrate().await?;
                tracing::info!("Database schema is up to date");
            }
            Ok(Arc::new(store))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; records are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
