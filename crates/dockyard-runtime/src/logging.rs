//! Subscriber setup for hosts without their own tracing pipeline.
//!
//! Filtering follows `DOCKYARD_LOG` (standard `EnvFilter` directives such as
//! `dockyard.store=debug,info`), defaulting to `info`. Store events use the
//! `dockyard.store` and `dockyard.persistence` targets.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Environment variable holding filter directives.
pub const LOG_ENV_VAR: &str = "DOCKYARD_LOG";

pub const DEFAULT_LOG_FILTER: &str = "info";

/// Output encoding of the fmt subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event, for log shippers.
    Json,
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to install tracing subscriber: {0}")]
    Install(String),
}

/// Filter from `DOCKYARD_LOG`, or [`DEFAULT_LOG_FILTER`] when unset or invalid.
#[must_use]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install a global fmt subscriber. Fails if one is already installed.
pub fn init(format: LogFormat) -> Result<(), LoggingError> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(true);
    let installed = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|err| LoggingError::Install(err.to_string()))
}
