//! Observability - logging setup and log hygiene
//!
//! The library only emits `tracing` events. Applications that want them on
//! stdout or in a file call [`init_tracing`] once at startup with a
//! [`TracingConfig`].

mod tracing_config;

pub use tracing_config::{OutputFormat, TracingConfig, TracingGuard, init_tracing};

/// Mask an API key or bearer token for logs.
pub fn mask_secret(value: &str) -> String {
    if let Some(token) = value.strip_prefix("Bearer ") {
        return format!("Bearer {}", mask_secret(token));
    }
    let len = value.chars().count();
    if len <= 8 {
        return "*".repeat(len);
    }
    let head: String = value.chars().take(4).collect();
    let tail: String = value.chars().skip(len - 4).collect();
    format!("{head}...{tail}")
}
