//! Display, layout and metrics validation.

use crate::schema::{CasementConfig, CellMetrics};

use super::helpers::{validate_range, validate_range_f64};

pub(crate) fn validate_display(errors: &mut Vec<String>, config: &CasementConfig) {
    validate_range(errors, "display.width", config.display.width, 1, 16384);
    validate_range(errors, "display.height", config.display.height, 1, 16384);
}

pub(crate) fn validate_layout(errors: &mut Vec<String>, config: &CasementConfig) {
    validate_range(
        errors,
        "layout.border_width",
        config.layout.border_width,
        0,
        16,
    );
}

/// Cell sizes must be positive and sane for both text window kinds.
pub(crate) fn validate_metrics(errors: &mut Vec<String>, config: &CasementConfig) {
    validate_cell(errors, "metrics.grid", &config.metrics.grid);
    validate_cell(errors, "metrics.buffer", &config.metrics.buffer);
}

fn validate_cell(errors: &mut Vec<String>, prefix: &str, cell: &CellMetrics) {
    validate_range_f64(errors, &format!("{prefix}.width"), cell.width, 1.0, 128.0);
    validate_range_f64(errors, &format!("{prefix}.height"), cell.height, 1.0, 128.0);
}
