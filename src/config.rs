// Run configuration for the reporting core
//
// CLI and config-file resolution live in the surrounding tool; this is the
// typed target those resolvers produce.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Active reporters, in invocation order
    #[serde(default = "default_reporters")]
    pub reporters: Vec<String>,

    /// Abort the run at the first failure or error
    #[serde(default)]
    pub fail_fast: bool,

    /// Enable colored output
    #[serde(default = "default_color")]
    pub color: bool,

    /// Progress glyph line width; 0 disables wrapping
    #[serde(default = "default_glyph_wrap")]
    pub glyph_wrap: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            reporters: default_reporters(),
            fail_fast: false,
            color: default_color(),
            glyph_wrap: default_glyph_wrap(),
        }
    }
}

fn default_reporters() -> Vec<String> {
    vec![String::from("dots")]
}

fn default_color() -> bool {
    true
}

fn default_glyph_wrap() -> usize {
    80
}
