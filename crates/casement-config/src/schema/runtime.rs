//! Runtime behaviour of the program driver.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Shortest timer interval honoured, in ms (valid range: 1-1000).
    pub timer_min_interval_ms: u32,
    /// Whether line input is echoed into the window by default.
    pub echo_line_input: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            timer_min_interval_ms: 10,
            echo_line_input: true,
        }
    }
}
