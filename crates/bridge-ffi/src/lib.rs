//! C ABI for the crypto bridge.
//!
//! Built as a `cdylib`/`staticlib` and linked into the mobile hosts, which
//! call the `crypto_bridge_*` symbols declared in `include/crypto_bridge.h`.
//! The host should call [`crypto_bridge_init`] once before anything else to
//! pick up `CRYPTO_BRIDGE_*` configuration and install logging; the crypto
//! entry points work without it, they just log nowhere.

mod c_api;
pub mod config;
mod telemetry;

pub use c_api::*;
