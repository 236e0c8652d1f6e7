//! tracing-subscriber setup: console plus rolling file.

use agora_core::{AgoraResult, ConfigError};
use std::path::PathBuf;
use std::str::FromStr;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "agora_api=info,agora_storage=info,agora_nlp=info,tower_http=info,info";

/// Console output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            other => Err(ConfigError::InvalidValue {
                field: "AGORA_LOG_FORMAT".to_string(),
                value: other.to_string(),
                reason: "expected json or pretty".to_string(),
            }),
        }
    }
}

/// Logging configuration from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Directory for the rolling log file. `None` disables the file sink.
    pub dir: Option<PathBuf>,
    /// File name prefix; rotation appends the date
    pub file: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            dir: Some(PathBuf::from("logs")),
            file: "app.log".to_string(),
            format: LogFormat::Json,
        }
    }
}

impl LogConfig {
    /// Environment variables:
    /// - `AGORA_LOG_DIR`: default `logs`; empty disables the file sink
    /// - `AGORA_LOG_FILE`: default `app.log`
    /// - `AGORA_LOG_FORMAT`: `json` (default) or `pretty`
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let dir = match std::env::var("AGORA_LOG_DIR") {
            Ok(dir) if dir.trim().is_empty() => None,
            Ok(dir) => Some(PathBuf::from(dir)),
            Err(_) => defaults.dir,
        };
        let format = match std::env::var("AGORA_LOG_FORMAT") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.format,
        };
        Ok(Self {
            dir,
            file: std::env::var("AGORA_LOG_FILE").unwrap_or(defaults.file),
            format,
        })
    }
}

/// Keeps the non-blocking file writer flushing. Hold it for the life of the
/// process; dropping it flushes and stops the writer thread.
#[derive(Debug)]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

/// Install the global subscriber. Filter directives come from `RUST_LOG`.
pub fn init_logging(config: &LogConfig) -> AgoraResult<LoggingGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let (json, pretty) = match config.format {
        LogFormat::Json => (Some(tracing_subscriber::fmt::layer().json()), None),
        LogFormat::Pretty => (None, Some(tracing_subscriber::fmt::layer().pretty())),
    };

    let (file_layer, guard) = match &config.dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, &config.file);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json)
        .with(pretty)
        .with(file_layer)
        .try_init()
        .map_err(|e| ConfigError::InvalidValue {
            field: "logging".to_string(),
            value: String::new(),
            reason: format!("failed to init subscriber: {}", e),
        })?;

    tracing::info!(
        format = ?config.format,
        dir = ?config.dir,
        file = %config.file,
        "logging initialized"
    );

    Ok(LoggingGuard { _file: guard })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_default_writes_logs_dir() {
        let config = LogConfig::default();
        assert_eq!(config.dir, Some(PathBuf::from("logs")));
        assert_eq!(config.file, "app.log");
        assert_eq!(config.format, LogFormat::Json);
    }
}
