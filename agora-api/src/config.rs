//! API Configuration Module
//!
//! [`AppConfig`] is built once at startup from environment variables and
//! handed to every component that needs it. Unparsable numbers fall back to
//! their defaults; values that cannot be honoured are a [`ConfigError`].

use crate::auth::AuthConfig;
use crate::telemetry::LogConfig;
use agora_core::{AgoraError, ConfigError};
use agora_nlp::NlpConfig;
use agora_storage::DbConfig;
use std::net::SocketAddr;
use std::str::FromStr;

pub const DEFAULT_PROJECT_NAME: &str = "NLP Service API";
pub const DEFAULT_API_PREFIX: &str = "/api/v1";
pub const DEFAULT_BIND: &str = "0.0.0.0:8000";

/// Which repository backend to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(StorageBackend::Postgres),
            "memory" | "mem" => Ok(StorageBackend::Memory),
            other => Err(ConfigError::InvalidValue {
                field: "AGORA_STORAGE".to_string(),
                value: other.to_string(),
                reason: "expected postgres or memory".to_string(),
            }),
        }
    }
}

/// Everything the service reads from its environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Title for the OpenAPI document
    pub project_name: String,
    /// Prefix every entity and NLP route is nested under
    pub api_prefix: String,
    pub bind: SocketAddr,
    pub storage: StorageBackend,
    pub db: DbConfig,
    pub nlp: NlpConfig,
    pub auth: AuthConfig,
    pub log: LogConfig,
    /// Allowed CORS origins. Empty means allow all origins (dev mode).
    pub cors_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            project_name: DEFAULT_PROJECT_NAME.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            bind: SocketAddr::from(([0, 0, 0, 0], 8000)),
            storage: StorageBackend::default(),
            db: DbConfig::default(),
            nlp: NlpConfig::default(),
            auth: AuthConfig::default(),
            log: LogConfig::default(),
            cors_origins: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Environment variables:
    /// - `AGORA_PROJECT_NAME`: default `NLP Service API`
    /// - `AGORA_API_PREFIX`: default `/api/v1`
    /// - `AGORA_BIND`: default `0.0.0.0:8000`; `PORT` overrides the port only
    /// - `AGORA_STORAGE`: `postgres` (default) or `memory`
    /// - `AGORA_CORS_ORIGINS`: comma-separated allowed origins
    ///
    /// plus the variables read by [`DbConfig`], [`NlpConfig`], [`AuthConfig`]
    /// and [`LogConfig`].
    pub fn from_env() -> Result<Self, AgoraError> {
        let defaults = Self::default();

        let project_name = std::env::var("AGORA_PROJECT_NAME")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.project_name);

        let api_prefix = match std::env::var("AGORA_API_PREFIX") {
            Ok(prefix) => normalize_prefix(&prefix),
            Err(_) => defaults.api_prefix,
        };

        let bind = resolve_bind_addr(
            std::env::var("AGORA_BIND").ok().as_deref(),
            std::env::var("PORT").ok().as_deref(),
        )?;

        let storage = match std::env::var("AGORA_STORAGE") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.storage,
        };

        let cors_origins = std::env::var("AGORA_CORS_ORIGINS")
            .ok()
            .map(|s| parse_origins(&s))
            .unwrap_or_default();

        Ok(Self {
            project_name,
            api_prefix,
            bind,
            storage,
            db: DbConfig::from_env(),
            nlp: NlpConfig::from_env(),
            auth: AuthConfig::from_env()?,
            log: LogConfig::from_env()?,
            cors_origins,
        })
    }
}

/// `api/v1/` → `/api/v1`. An empty or `/` prefix mounts at the root.
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

/// Bind address from `AGORA_BIND`, with `PORT` replacing just the port.
pub fn resolve_bind_addr(bind: Option<&str>, port: Option<&str>) -> Result<SocketAddr, ConfigError> {
    let raw = bind.map(str::trim).filter(|s| !s.is_empty()).unwrap_or(DEFAULT_BIND);
    let mut addr: SocketAddr = raw.parse().map_err(|_| ConfigError::InvalidValue {
        field: "AGORA_BIND".to_string(),
        value: raw.to_string(),
        reason: "expected host:port".to_string(),
    })?;

    if let Some(port) = port.map(str::trim).filter(|s| !s.is_empty()) {
        let port = port.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
            field: "PORT".to_string(),
            value: port.to_string(),
            reason: "expected a port number".to_string(),
        })?;
        addr.set_port(port);
    }
    Ok(addr)
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect()
}
