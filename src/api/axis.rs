use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::core::{DrawConfig, DrawingCache, Orientation, Point, Rect};
use crate::error::ChartResult;
use crate::render::{Painter, TextMetrics, TransformGuard};

use super::AxisConfig;

static NEXT_AXIS_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a registered axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AxisId(u64);

impl AxisId {
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_AXIS_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// One tick of a value axis; `label_rect` is the label extent at the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct TickInfo {
    pub value: f64,
    pub text: String,
    pub label_rect: Rect,
}

/// One bar range `[head, tail)` of a bar axis.
///
/// `label_pos` is in drawer units along the axis.
#[derive(Debug, Clone, PartialEq)]
pub struct BarInfo {
    pub label_value: f64,
    pub label_pos: f64,
    pub head: f64,
    pub tail: f64,
    pub text: String,
    pub label_rect: Rect,
}

/// Grid lines and tick labels along one edge of the plot area.
///
/// Per frame the pipeline calls `prepare`, then `draw_grid` before series and
/// `draw_labels` after them. All drawing happens in device space.
pub trait AxisDrawer {
    fn id(&self) -> AxisId;

    fn config(&self) -> &AxisConfig;

    /// Recomputes ticks for this frame; measures labels with `painter`.
    fn prepare(&mut self, config: &DrawConfig, cache: &DrawingCache, painter: &dyn Painter);

    fn draw_grid(&self, cache: &DrawingCache, painter: &mut dyn Painter) -> ChartResult<()>;

    fn draw_labels(&self, cache: &DrawingCache, painter: &mut dyn Painter) -> ChartResult<()>;
}

/// Label extent at the local origin.
pub(super) fn label_rect(metrics: TextMetrics) -> Rect {
    Rect::new(0.0, 0.0, metrics.width, metrics.height)
}

/// Tail length for a grid line whose label has extent `label`.
pub(super) fn grid_tail_length(config: &AxisConfig, label: Rect) -> f64 {
    config
        .grid_tail_length
        .unwrap_or(match config.orientation {
            Orientation::Horizontal => label.height,
            Orientation::Vertical => label.width,
        })
}

/// Top edge of horizontal-axis labels.
pub(super) fn horizontal_label_top(config: &AxisConfig, cache: &DrawingCache) -> f64 {
    cache.plot_area.bottom() + 1.0 + config.label_spacing_to_plot_area
}

/// Right edge of vertical-axis labels.
pub(super) fn vertical_label_right(config: &AxisConfig, cache: &DrawingCache) -> f64 {
    cache.plot_area.left() - 1.0 - config.label_spacing_to_plot_area
}

/// Grid line at drawer coordinate `value` across the plot, extended by `tail`
/// past the label-side edge.
pub(super) fn stroke_grid_line(
    config: &AxisConfig,
    cache: &DrawingCache,
    painter: &mut dyn Painter,
    value: f64,
    tail: f64,
) -> ChartResult<()> {
    let plot = cache.plot_area;
    let (from, to) = match config.orientation {
        Orientation::Horizontal => {
            let x = cache.drawer_x_to_device(value);
            (Point::new(x, plot.top()), Point::new(x, plot.bottom() + tail))
        }
        Orientation::Vertical => {
            let y = cache.drawer_y_to_device(value);
            (
                Point::new(plot.left() - 1.0 - tail, y),
                Point::new(plot.right(), y),
            )
        }
    };
    painter.stroke_line(
        from,
        to,
        config.style.grid_line_width,
        config.style.grid_color,
    )
}

/// Draws `text` with its top-left corner at `origin` through a scoped
/// translation, so the painter transform is restored on every exit path.
pub(super) fn draw_label_at(
    config: &AxisConfig,
    painter: &mut dyn Painter,
    origin: Point,
    text: &str,
) -> ChartResult<()> {
    if text.is_empty() {
        return Ok(());
    }
    let mut guard = TransformGuard::translated(painter, origin.x, origin.y);
    guard.draw_text(
        text,
        Point::ORIGIN,
        config.style.font_size_px,
        config.style.label_color,
    )
}
