//! Tracing subscriber setup for the embedded bridge.
//!
//! The library itself only emits `tracing` events; the subscriber is installed
//! here, once, when the host calls `crypto_bridge_init`.
//!
//! # Logging invariants
//!
//! - **No key material, nonces, tags or message bytes** in any log field.
//! - `RUST_LOG` overrides `CRYPTO_BRIDGE_LOG_LEVEL`.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::config::{BridgeConfig, LogFormat};

/// Install the global tracing subscriber described by `cfg`.
///
/// # Errors
///
/// Returns an error if the log format is invalid or a global subscriber has
/// already been set by the host process.
pub fn init(cfg: &BridgeConfig) -> Result<()> {
    let format = cfg.format()?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let installed = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.compact().try_init(),
    };
    installed.map_err(|e| {
        anyhow::anyhow!("failed to initialise crypto bridge tracing subscriber: {e}")
    })?;

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        log_level = %cfg.log_level,
        "crypto bridge logging initialised"
    );
    Ok(())
}
