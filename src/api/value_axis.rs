use crate::core::{DrawConfig, DrawingCache, Orientation, Point, TickSequence};
use crate::error::ChartResult;
use crate::render::Painter;

use super::axis::{
    draw_label_at, grid_tail_length, horizontal_label_top, label_rect, stroke_grid_line,
    vertical_label_right,
};
use super::{AxisConfig, AxisDrawer, AxisId, LabelFormatterFn, TickInfo, default_label_formatter};

/// Axis with evenly spaced ticks over the visible index window (horizontal)
/// or the committed value range (vertical).
///
/// Vertical axes skip the lowest tick; its label would overlap the
/// horizontal axis.
pub struct ValueAxis {
    id: AxisId,
    config: AxisConfig,
    formatter: LabelFormatterFn,
    ticks: Vec<TickInfo>,
}

impl ValueAxis {
    pub fn new(config: AxisConfig) -> ChartResult<Self> {
        Ok(Self {
            id: AxisId::next(),
            config: config.validate()?,
            formatter: default_label_formatter(),
            ticks: Vec::new(),
        })
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: LabelFormatterFn) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn set_config(&mut self, config: AxisConfig) -> ChartResult<()> {
        self.config = config.validate()?;
        Ok(())
    }

    pub fn set_formatter(&mut self, formatter: LabelFormatterFn) {
        self.formatter = formatter;
    }

    /// Ticks computed by the last `prepare`.
    #[must_use]
    pub fn ticks(&self) -> &[TickInfo] {
        &self.ticks
    }
}

impl AxisDrawer for ValueAxis {
    fn id(&self) -> AxisId {
        self.id
    }

    fn config(&self) -> &AxisConfig {
        &self.config
    }

    fn prepare(&mut self, config: &DrawConfig, _cache: &DrawingCache, painter: &dyn Painter) {
        let sequence = match self.config.orientation {
            Orientation::Horizontal => TickSequence::new(
                config.begin as f64,
                config.end as f64,
                self.config.tick_count,
            ),
            Orientation::Vertical => {
                TickSequence::new(config.y_low, config.y_high, self.config.tick_count)
                    .skip_first()
            }
        };

        let font_size_px = self.config.style.font_size_px;
        self.ticks = sequence
            .map(|value| {
                let text = (self.formatter)(value);
                let metrics = painter.measure_text(&text, font_size_px);
                TickInfo {
                    value,
                    text,
                    label_rect: label_rect(metrics),
                }
            })
            .collect();
    }

    fn draw_grid(&self, cache: &DrawingCache, painter: &mut dyn Painter) -> ChartResult<()> {
        if !self.config.style.axis_visible || !self.config.style.grid_visible {
            return Ok(());
        }
        for tick in &self.ticks {
            let tail = grid_tail_length(&self.config, tick.label_rect);
            stroke_grid_line(&self.config, cache, painter, tick.value, tail)?;
        }
        Ok(())
    }

    fn draw_labels(&self, cache: &DrawingCache, painter: &mut dyn Painter) -> ChartResult<()> {
        if !self.config.style.axis_visible || !self.config.style.label_visible {
            return Ok(());
        }
        for tick in &self.ticks {
            let size = tick.label_rect;
            let origin = match self.config.orientation {
                Orientation::Horizontal => Point::new(
                    cache.drawer_x_to_device(tick.value) - size.width / 2.0,
                    horizontal_label_top(&self.config, cache),
                ),
                Orientation::Vertical => Point::new(
                    vertical_label_right(&self.config, cache) - size.width,
                    cache.drawer_y_to_device(tick.value) - size.height / 2.0,
                ),
            };
            draw_label_at(&self.config, painter, origin, &tick.text)?;
        }
        Ok(())
    }
}
