use crate::core::{DrawConfig, DrawingCache, Orientation, Point, TickSequence};
use crate::error::ChartResult;
use crate::render::Painter;

use super::axis::{
    draw_label_at, grid_tail_length, horizontal_label_top, label_rect, stroke_grid_line,
    vertical_label_right,
};
use super::{
    AxisConfig, AxisDrawer, AxisId, BarInfo, LabelFormatterFn, TickAnchor,
    default_label_formatter,
};

/// Axis bound to consecutive ranges `[head, tail)`.
///
/// Grid lines sit on every head. `tick_source` picks the labelled value and
/// `tick_position` where the label sits inside its range.
pub struct BarAxis {
    id: AxisId,
    config: AxisConfig,
    formatter: LabelFormatterFn,
    bars: Vec<BarInfo>,
}

impl BarAxis {
    pub fn new(config: AxisConfig) -> ChartResult<Self> {
        Ok(Self {
            id: AxisId::next(),
            config: config.validate()?,
            formatter: default_label_formatter(),
            bars: Vec::new(),
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

    /// Bars computed by the last `prepare`.
    #[must_use]
    pub fn bars(&self) -> &[BarInfo] {
        &self.bars
    }

    fn to_device(&self, cache: &DrawingCache, value: f64) -> f64 {
        match self.config.orientation {
            Orientation::Horizontal => cache.drawer_x_to_device(value),
            Orientation::Vertical => cache.drawer_y_to_device(value),
        }
    }

    /// Whether the last tail lies strictly inside the plot along the axis.
    fn tail_inside_plot(&self, cache: &DrawingCache, tail: f64) -> bool {
        let device = self.to_device(cache, tail);
        match self.config.orientation {
            Orientation::Horizontal => device < cache.plot_area.right(),
            Orientation::Vertical => device > cache.plot_area.top(),
        }
    }
}

impl AxisDrawer for BarAxis {
    fn id(&self) -> AxisId {
        self.id
    }

    fn config(&self) -> &AxisConfig {
        &self.config
    }

    fn prepare(&mut self, config: &DrawConfig, cache: &DrawingCache, painter: &dyn Painter) {
        let horizontal = self.config.orientation.is_horizontal();
        let (begin, end) = if horizontal {
            (config.begin as f64, config.end as f64)
        } else {
            (config.y_low, config.y_high)
        };
        let to_drawer_len = |device_len: f64| {
            if horizontal {
                cache.device_width_to_drawer(device_len)
            } else {
                cache.device_height_to_drawer(device_len)
            }
        };
        let spacing = to_drawer_len(self.config.label_spacing_to_grid);

        let sequence = TickSequence::new(begin, end, self.config.tick_count);
        let step = sequence.step();
        let font_size_px = self.config.style.font_size_px;

        self.bars = sequence
            .map(|head| {
                let tail = head + step;
                let mid = (head + tail) / 2.0;
                let label_value = match self.config.tick_source {
                    TickAnchor::Begin => head,
                    TickAnchor::Mid => mid,
                    TickAnchor::End => tail,
                };
                let text = (self.formatter)(label_value);
                let label_rect = label_rect(painter.measure_text(&text, font_size_px));
                let label_len = to_drawer_len(if horizontal {
                    label_rect.width
                } else {
                    label_rect.height
                });
                let label_pos = match self.config.tick_position {
                    TickAnchor::Begin => head + spacing,
                    TickAnchor::Mid => mid - label_len / 2.0,
                    TickAnchor::End => tail - label_len - spacing,
                };
                BarInfo {
                    label_value,
                    label_pos,
                    head,
                    tail,
                    text,
                    label_rect,
                }
            })
            .collect();
    }

    fn draw_grid(&self, cache: &DrawingCache, painter: &mut dyn Painter) -> ChartResult<()> {
        if !self.config.style.axis_visible || !self.config.style.grid_visible {
            return Ok(());
        }
        let Some(last) = self.bars.last() else {
            return Ok(());
        };
        for bar in &self.bars {
            let tail = grid_tail_length(&self.config, bar.label_rect);
            stroke_grid_line(&self.config, cache, painter, bar.head, tail)?;
        }
        if self.tail_inside_plot(cache, last.tail) {
            let tail = grid_tail_length(&self.config, last.label_rect);
            stroke_grid_line(&self.config, cache, painter, last.tail, tail)?;
        }
        Ok(())
    }

    fn draw_labels(&self, cache: &DrawingCache, painter: &mut dyn Painter) -> ChartResult<()> {
        if !self.config.style.axis_visible || !self.config.style.label_visible {
            return Ok(());
        }
        for bar in &self.bars {
            let size = bar.label_rect;
            let origin = match self.config.orientation {
                Orientation::Horizontal => Point::new(
                    cache.drawer_x_to_device(bar.label_pos),
                    horizontal_label_top(&self.config, cache),
                ),
                Orientation::Vertical => Point::new(
                    vertical_label_right(&self.config, cache) - size.width,
                    cache.drawer_y_to_device(bar.label_pos) - size.height,
                ),
            };
            draw_label_at(&self.config, painter, origin, &bar.text)?;
        }
        Ok(())
    }
}
