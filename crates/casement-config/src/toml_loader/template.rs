//! Default TOML config template with inline documentation comments.

use crate::schema::CONFIG_SCHEMA_VERSION;

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    format!("# casement configuration\n# Schema version {CONFIG_SCHEMA_VERSION}\n{TEMPLATE_BODY}")
}

const TEMPLATE_BODY: &str = r##"# Only override what you want to change -- missing fields use defaults.

[display]
# width = 800            # 1-16384
# height = 600           # 1-16384
# title = "casement"

[layout]
# border_width = 1       # 0-16, pixels between bordered siblings

[metrics.grid]
# width = 8.0            # 1.0-128.0
# height = 16.0

[metrics.buffer]
# width = 8.0            # 1.0-128.0
# height = 16.0

[runtime]
# timer_min_interval_ms = 10   # 1-1000
# echo_line_input = true

[logging]
# level = "INFO"         # DEBUG, INFO, WARNING, ERROR
"##;
