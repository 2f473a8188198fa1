use serde::{Deserialize, Serialize};
use tracing::warn;

/// Editor settings supplied by the page. Every field has a default, so a
/// partial (or empty) object is accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Prefix for every backend path, e.g. `https://host`; empty means same origin.
    pub api_base: String,
    /// Arrow-key step in degrees.
    pub nudge_step: f64,
    /// Arrow-key step with Shift held.
    pub nudge_step_large: f64,
    pub copy_flash_ms: u32,
    pub paste_flash_ms: u32,
    pub default_block: String,
    pub default_price: f64,
    pub default_area: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            api_base: String::new(),
            nudge_step: 0.00001,
            nudge_step_large: 0.0001,
            copy_flash_ms: 300,
            paste_flash_ms: 500,
            default_block: "M1".to_string(),
            default_price: 50_000_000.0,
            default_area: 200,
        }
    }
}

impl EditorConfig {
    /// Replaces unusable numeric settings with their defaults.
    pub fn sanitized(mut self) -> Self {
        let d = EditorConfig::default();
        if !(self.nudge_step.is_finite() && self.nudge_step > 0.0) {
            warn!(value = self.nudge_step, "nudge_step must be positive; using default");
            self.nudge_step = d.nudge_step;
        }
        if !(self.nudge_step_large.is_finite() && self.nudge_step_large > 0.0) {
            warn!(value = self.nudge_step_large, "nudge_step_large must be positive; using default");
            self.nudge_step_large = d.nudge_step_large;
        }
        if !(self.default_price.is_finite() && self.default_price > 0.0) {
            self.default_price = d.default_price;
        }
        if self.default_area == 0 {
            self.default_area = d.default_area;
        }
        self.api_base = self.api_base.trim_end_matches('/').to_string();
        self
    }
}
