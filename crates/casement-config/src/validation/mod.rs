//! Full configuration validation.
//!
//! Validates numeric ranges section by section and collects every error
//! into a single `ConfigError`.

mod helpers;
mod layout;
mod misc;


use crate::schema::CasementConfig;
use casement_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &CasementConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    layout::validate_display(&mut errors, config);
    layout::validate_layout(&mut errors, config);
    layout::validate_metrics(&mut errors, config);
    misc::validate_runtime(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
