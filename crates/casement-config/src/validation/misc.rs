//! Validation for the runtime section.

use crate::schema::CasementConfig;

use super::helpers::validate_range;

pub(crate) fn validate_runtime(errors: &mut Vec<String>, config: &CasementConfig) {
    validate_range(
        errors,
        "runtime.timer_min_interval_ms",
        config.runtime.timer_min_interval_ms,
        1,
        1000,
    );
}
