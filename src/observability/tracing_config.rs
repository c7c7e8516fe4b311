//! Tracing subscriber configuration

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::error::{GenerationError, Result};

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pretty,
    Compact,
    Json,
}

/// Subscriber settings.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub enabled: bool,
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
    pub format: OutputFormat,
    /// Directory for a daily rolling log file; stdout when `None`
    pub log_dir: Option<PathBuf>,
}

impl TracingConfig {
    /// Verbose human-readable output for local work.
    pub fn development() -> Self {
        Self {
            enabled: true,
            filter: "unigen=debug".to_string(),
            format: OutputFormat::Pretty,
            log_dir: None,
        }
    }

    pub fn minimal() -> Self {
        Self {
            enabled: true,
            filter: "unigen=warn".to_string(),
            format: OutputFormat::Compact,
            log_dir: None,
        }
    }

    /// Structured JSON lines for production collectors.
    pub fn json() -> Self {
        Self {
            enabled: true,
            filter: "unigen=info".to_string(),
            format: OutputFormat::Json,
            log_dir: None,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::minimal()
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self::minimal()
    }
}

/// Keeps the background log writer alive; drop it at shutdown to flush.
pub struct TracingGuard {
    _guard: Option<WorkerGuard>,
}

/// Install a global subscriber according to `config`.
///
/// Fails if a global subscriber is already set.
pub fn init_tracing(config: &TracingConfig) -> Result<TracingGuard> {
    if !config.enabled {
        return Ok(TracingGuard { _guard: None });
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .map_err(|e| GenerationError::Configuration(format!("invalid log filter: {e}")))?;

    let (writer, guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "unigen.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (writer, Some(guard))
        }
        None => {
            let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
            (writer, Some(guard))
        }
    };

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.format {
        OutputFormat::Pretty => registry
            .with(fmt::layer().pretty().with_writer(writer))
            .try_init(),
        OutputFormat::Compact => registry
            .with(fmt::layer().compact().with_writer(writer))
            .try_init(),
        OutputFormat::Json => registry
            .with(fmt::layer().json().with_writer(writer))
            .try_init(),
    };
    result.map_err(|e| GenerationError::Configuration(format!("tracing init failed: {e}")))?;

    Ok(TracingGuard { _guard: guard })
}
