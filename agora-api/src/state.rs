//! Shared application state for Axum routers.

use std::sync::Arc;
use std::time::Instant;

use agora_nlp::NlpService;

use crate::auth::AuthConfig;
use crate::db::DbClient;

/// Application-wide state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    pub db: DbClient,
    pub nlp: NlpService,
    pub auth: AuthConfig,
    /// Title reported by the OpenAPI document
    pub project_name: Arc<str>,
    /// Prefix the API routes are mounted under
    pub api_prefix: Arc<str>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(db: DbClient, nlp: NlpService, auth: AuthConfig) -> Self {
        Self {
            db,
            nlp,
            auth,
            project_name: Arc::from(crate::config::DEFAULT_PROJECT_NAME),
            api_prefix: Arc::from(crate::config::DEFAULT_API_PREFIX),
            start_time: Instant::now(),
        }
    }

    pub fn with_project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Arc::from(name.into());
        self
    }

    pub fn with_api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = Arc::from(prefix.into());
        self
    }
}

crate::impl_from_ref!(DbClient, db);
crate::impl_from_ref!(NlpService, nlp);
crate::impl_from_ref!(AuthConfig, auth);
crate::impl_from_ref!(Instant, start_time);
