//! Display surface, pair layout and unit metric configuration types.

use casement_common::UnitSize;
use serde::{Deserialize, Serialize};

/// Initial viewport of the display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Viewport width in pixels (valid range: 1-16384).
    pub width: u32,
    /// Viewport height in pixels (valid range: 1-16384).
    pub height: u32,
    pub title: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "casement".into(),
        }
    }
}

/// Pair window layout configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Pixels between the children of a bordered pair (valid range: 0-16).
    pub border_width: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { border_width: 1 }
    }
}

/// Pixel size of one character cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellMetrics {
    pub width: f64,
    pub height: f64,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            width: 8.0,
            height: 16.0,
        }
    }
}

impl From<CellMetrics> for UnitSize {
    fn from(cell: CellMetrics) -> Self {
        UnitSize::new(cell.width, cell.height)
    }
}

/// Native units of text windows. Graphics and blank windows measure in
/// pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct MetricsConfig {
    /// Text grid cell (valid range per axis: 1.0-128.0).
    pub grid: CellMetrics,
    /// Text buffer cell (valid range per axis: 1.0-128.0).
    pub buffer: CellMetrics,
}
