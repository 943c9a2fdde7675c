//! Reading a config file into a `CasementConfig`.
//!
//! Loading only parses. Range checks live in `validation` and are applied
//! by `load_config`.

use std::io::ErrorKind;
use std::path::Path;

use casement_common::ConfigError;
use tracing::info;

use super::paths::{create_default_config, default_config_path};
use crate::schema::CasementConfig;

/// Parse the TOML file at `path`. Missing fields take their defaults.
pub fn load_from_path(path: &Path) -> Result<CasementConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ConfigError::FileNotFound(path.to_path_buf()),
        _ => ConfigError::ParseError(format!("cannot read {}: {e}", path.display())),
    })?;
    let config = toml::from_str(&text)
        .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;
    info!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Load `<platform config dir>/casement/config.toml`, seeding it with the
/// commented template on first run.
pub fn load_default() -> Result<CasementConfig, ConfigError> {
    let path = default_config_path()?;
    match load_from_path(&path) {
        Err(ConfigError::FileNotFound(_)) => {
            create_default_config(&path)?;
            Ok(CasementConfig::default())
        }
        loaded => loaded,
    }
}
