//! Agora Telemetry - Logging Infrastructure
//!
//! Structured logs go to the console and to a daily-rotated file. Every
//! request runs inside a span carrying its method, normalized route and
//! request id.

pub mod logging;
pub mod middleware;

pub use logging::{init_logging, LogConfig, LogFormat, LoggingGuard};
pub use middleware::{observability_middleware, REQUEST_ID_HEADER};
