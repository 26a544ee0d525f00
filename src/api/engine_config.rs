use serde::{Deserialize, Serialize};

use crate::core::{FitPolicy, Paddings, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// Outline stroked around the plot area at the end of every frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotBorderStyle {
    pub visible: bool,
    pub color: Color,
    pub width: f64,
}

impl Default for PlotBorderStyle {
    fn default() -> Self {
        Self {
            visible: true,
            color: Color::BLACK,
            width: 1.0,
        }
    }
}

/// Engine-wide configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartEngineConfig {
    pub viewport: Viewport,
    #[serde(default)]
    pub paddings: Paddings,
    /// Headroom ratio applied around the combined preferred value range.
    #[serde(default = "default_y_scale")]
    pub y_scale: f64,
    #[serde(default)]
    pub fit_policy: FitPolicy,
    #[serde(default)]
    pub border: PlotBorderStyle,
}

impl ChartEngineConfig {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            paddings: Paddings::default(),
            y_scale: default_y_scale(),
            fit_policy: FitPolicy::default(),
            border: PlotBorderStyle::default(),
        }
    }

    #[must_use]
    pub fn with_paddings(mut self, paddings: Paddings) -> Self {
        self.paddings = paddings;
        self
    }

    #[must_use]
    pub fn with_y_scale(mut self, y_scale: f64) -> Self {
        self.y_scale = y_scale;
        self
    }

    #[must_use]
    pub fn with_fit_policy(mut self, fit_policy: FitPolicy) -> Self {
        self.fit_policy = fit_policy;
        self
    }

    #[must_use]
    pub fn with_border(mut self, border: PlotBorderStyle) -> Self {
        self.border = border;
        self
    }

    pub fn validate(self) -> ChartResult<Self> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        self.paddings.validate()?;
        if !self.y_scale.is_finite() || self.y_scale <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "y scale must be finite and > 0".to_owned(),
            ));
        }
        self.fit_policy.validate()?;
        self.border.color.validate()?;
        if !self.border.width.is_finite() || self.border.width <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "plot border width must be finite and > 0".to_owned(),
            ));
        }
        Ok(self)
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(self) -> ChartResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes and validates config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config: {e}")))?;
        config.validate()
    }
}

fn default_y_scale() -> f64 {
    1.1
}
