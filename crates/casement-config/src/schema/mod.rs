//! Configuration schema types for casement.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with the defaults below.

mod layout;
mod runtime;
mod system;

pub use layout::*;
pub use runtime::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
///
/// Only override what you want to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct CasementConfig {
    pub display: DisplayConfig,
    pub layout: LayoutConfig,
    pub metrics: MetricsConfig,
    pub runtime: RuntimeConfig,
    pub logging: LoggingConfig,
}
