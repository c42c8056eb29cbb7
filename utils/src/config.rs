//! Loading moderation parameters from TOML.
//!
//! File settings override code defaults; missing fields fall back to the
//! defaults (the params struct carries `#[serde(default)]`). A missing file
//! is not an error — deployments without a config run on defaults.

use factum_types::ModerationParams;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Parse moderation parameters from TOML text.
pub fn params_from_toml(contents: &str) -> Result<ModerationParams, ConfigError> {
    Ok(toml::from_str(contents)?)
}

/// Load moderation parameters from a TOML file, falling back to defaults
/// when the file does not exist.
pub fn load_params(path: &Path) -> Result<ModerationParams, ConfigError> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "no config file, using default parameters");
        return Ok(ModerationParams::defaults());
    }
    let contents = std::fs::read_to_string(path)?;
    let params = params_from_toml(&contents)?;
    tracing::info!(path = %path.display(), "loaded moderation parameters");
    Ok(params)
}
