use serde::{Deserialize, Serialize};

use crate::core::Orientation;
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// Point of a bar range `[head, tail)` used by bar axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TickAnchor {
    #[default]
    Begin,
    Mid,
    End,
}

/// Visual style shared by value and bar axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisStyle {
    pub axis_visible: bool,
    pub grid_visible: bool,
    pub label_visible: bool,
    pub grid_color: Color,
    pub grid_line_width: f64,
    pub label_color: Color,
    pub font_size_px: f64,
}

impl Default for AxisStyle {
    fn default() -> Self {
        Self {
            axis_visible: true,
            grid_visible: true,
            label_visible: true,
            grid_color: Color::rgb(0.827, 0.827, 0.827),
            grid_line_width: 1.0,
            label_color: Color::BLACK,
            font_size_px: 12.0,
        }
    }
}

impl AxisStyle {
    pub fn validate(self) -> ChartResult<Self> {
        self.grid_color.validate()?;
        self.label_color.validate()?;
        if !self.grid_line_width.is_finite() || self.grid_line_width <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "axis grid line width must be finite and > 0".to_owned(),
            ));
        }
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "axis font size must be finite and > 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Tick layout for one axis.
///
/// `tick_source`, `tick_position` and `grid_tail_length` only affect bar axes,
/// except that value axes also honor the grid tail.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisConfig {
    pub orientation: Orientation,
    #[serde(default = "default_tick_count")]
    pub tick_count: usize,
    #[serde(default)]
    pub tick_source: TickAnchor,
    #[serde(default)]
    pub tick_position: TickAnchor,
    /// Device pixels the grid line extends past the plot edge; `None` uses the
    /// label size perpendicular to the axis.
    #[serde(default)]
    pub grid_tail_length: Option<f64>,
    #[serde(default = "default_label_spacing")]
    pub label_spacing_to_grid: f64,
    #[serde(default = "default_label_spacing")]
    pub label_spacing_to_plot_area: f64,
    #[serde(default)]
    pub style: AxisStyle,
}

impl AxisConfig {
    #[must_use]
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            tick_count: default_tick_count(),
            tick_source: TickAnchor::default(),
            tick_position: TickAnchor::default(),
            grid_tail_length: None,
            label_spacing_to_grid: default_label_spacing(),
            label_spacing_to_plot_area: default_label_spacing(),
            style: AxisStyle::default(),
        }
    }

    #[must_use]
    pub fn horizontal() -> Self {
        Self::new(Orientation::Horizontal)
    }

    #[must_use]
    pub fn vertical() -> Self {
        Self::new(Orientation::Vertical)
    }

    #[must_use]
    pub fn with_tick_count(mut self, tick_count: usize) -> Self {
        self.tick_count = tick_count;
        self
    }

    #[must_use]
    pub fn with_tick_source(mut self, tick_source: TickAnchor) -> Self {
        self.tick_source = tick_source;
        self
    }

    #[must_use]
    pub fn with_tick_position(mut self, tick_position: TickAnchor) -> Self {
        self.tick_position = tick_position;
        self
    }

    #[must_use]
    pub fn with_grid_tail_length(mut self, grid_tail_length: Option<f64>) -> Self {
        self.grid_tail_length = grid_tail_length;
        self
    }

    #[must_use]
    pub fn with_label_spacing_to_grid(mut self, spacing: f64) -> Self {
        self.label_spacing_to_grid = spacing;
        self
    }

    #[must_use]
    pub fn with_label_spacing_to_plot_area(mut self, spacing: f64) -> Self {
        self.label_spacing_to_plot_area = spacing;
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: AxisStyle) -> Self {
        self.style = style;
        self
    }

    pub fn validate(self) -> ChartResult<Self> {
        for (name, value) in [
            ("label_spacing_to_grid", self.label_spacing_to_grid),
            ("label_spacing_to_plot_area", self.label_spacing_to_plot_area),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "axis `{name}` must be finite and >= 0"
                )));
            }
        }
        if let Some(tail) = self.grid_tail_length {
            if !tail.is_finite() || tail < 0.0 {
                return Err(ChartError::InvalidConfig(
                    "axis grid tail length must be finite and >= 0".to_owned(),
                ));
            }
        }
        self.style.validate()?;
        Ok(self)
    }
}

fn default_tick_count() -> usize {
    5
}

fn default_label_spacing() -> f64 {
    2.0
}
