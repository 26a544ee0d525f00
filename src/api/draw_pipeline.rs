use std::time::Instant;

use tracing::trace;

use crate::core::{DrawingCache, ValueRange};
use crate::error::ChartResult;
use crate::render::{Painter, TransformGuard};

use super::ChartEngine;

impl ChartEngine {
    /// Draws one frame at the current time.
    pub fn draw(&mut self, painter: &mut dyn Painter) -> ChartResult<()> {
        self.draw_at(painter, Instant::now())
    }

    /// Draws one frame; `now` drives debounced value-range commits.
    ///
    /// Order: fit the value range, build the frame transform, axis grids,
    /// series in drawer space, axis labels, plot border. An empty or
    /// inverted x window only draws the border.
    pub fn draw_at(&mut self, painter: &mut dyn Painter, now: Instant) -> ChartResult<()> {
        self.repaint.begin_frame();

        let mut config = self.draw_config;
        let has_data = config.has_showing_data();

        if has_data {
            let preferred: Vec<ValueRange> = self
                .series
                .values()
                .filter_map(|series| series.borrow().preferred_range(&config))
                .collect();
            if let Some(committed) = self.fitter.fit(preferred, now) {
                config = config.with_value_range(committed);
            }
        } else {
            if let Some(committed) = self.fitter.poll(now) {
                config = config.with_value_range(committed);
            }
            trace!(
                begin = config.begin,
                end = config.end,
                "skip fit and series for empty x window"
            );
        }

        let plot_area = self.plot_area();
        let device_height = f64::from(self.config.viewport.height);
        let cache = DrawingCache::build(&config, plot_area, device_height)?;
        self.last_frame = Some(cache);

        if has_data {
            for axis in self.axes.values() {
                axis.borrow_mut().prepare(&config, &cache, &*painter);
            }
            for axis in self.axes.values() {
                axis.borrow().draw_grid(&cache, painter)?;
            }
            {
                let mut drawer_space = TransformGuard::concatenated(painter, cache.drawer_to_device);
                for series in self.series.values() {
                    series.borrow_mut().draw(&config, &mut *drawer_space)?;
                }
            }
            for axis in self.axes.values() {
                axis.borrow().draw_labels(&cache, painter)?;
            }
        }

        let border = self.config.border;
        if border.visible {
            painter.stroke_rect(plot_area, border.width, border.color)?;
        }

        self.draw_config = self.draw_config.with_value_range(config.value_range());
        Ok(())
    }
}
