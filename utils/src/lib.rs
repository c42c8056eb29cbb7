//! Shared utilities for the factum moderation engine.

pub mod config;
pub mod logging;

pub use config::{load_params, params_from_toml, ConfigError};
pub use logging::init_tracing;
