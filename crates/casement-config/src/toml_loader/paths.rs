//! Where the config file lives, and seeding it on first run.

use casement_common::ConfigError;
use std::path::{Path, PathBuf};
use tracing::info;

use super::template::default_config_toml;
use crate::toml_writer::write_atomic;

/// `<platform config dir>/casement/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("casement").join("config.toml"))
        .ok_or_else(|| ConfigError::ParseError("no platform config directory".into()))
}

/// Write the commented template to `path`.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    write_atomic(path, &default_config_toml())?;
    info!(path = %path.display(), "created default config");
    Ok(())
}
