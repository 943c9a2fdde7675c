//! Writing config files.
//!
//! Every write lands in a sibling `.tmp` file first and is renamed over
//! the target, so a reader never sees half a file.

use std::fs;
use std::path::Path;

use casement_common::ConfigError;

use crate::schema::{CasementConfig, CONFIG_SCHEMA_VERSION};

/// Serialize `config` as TOML under a schema header and write it to `path`.
pub fn save_config_to_path(config: &CasementConfig, path: &Path) -> Result<(), ConfigError> {
    let body = toml::to_string_pretty(config)
        .map_err(|e| ConfigError::ParseError(format!("cannot serialize config: {e}")))?;
    let text = format!("# casement configuration\n# Schema version {CONFIG_SCHEMA_VERSION}\n\n{body}");
    write_atomic(path, &text)?;
    tracing::info!(path = %path.display(), "config written");
    Ok(())
}

/// Write `text` to `path`, creating missing parent directories.
pub(crate) fn write_atomic(path: &Path, text: &str) -> Result<(), ConfigError> {
    let failed = |source| ConfigError::WriteError {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(failed)?;
    }
    let staging = path.with_extension("toml.tmp");
    fs::write(&staging, text).map_err(failed)?;
    if let Err(e) = fs::rename(&staging, path) {
        let _ = fs::remove_file(&staging);
        return Err(failed(e));
    }
    Ok(())
}
