use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use indexmap::IndexMap;
use tracing::debug;

use crate::core::{
    DrawConfig, DrawingCache, FitPolicy, Paddings, Point, Rect, ValueRange, Viewport,
    ViewportFitter,
};
use crate::error::{ChartError, ChartResult};

use super::{AxisDrawer, AxisId, ChartEngineConfig, RepaintGate, SeriesDrawer, SeriesId};

pub(super) type SharedSeries = Rc<RefCell<dyn SeriesDrawer>>;
pub(super) type SharedAxis = Rc<RefCell<dyn AxisDrawer>>;

/// Main orchestration facade consumed by host widgets.
///
/// `ChartEngine` owns the live draw parameters, the viewport fitter and the
/// registered series and axes. Frames are drawn with
/// [`ChartEngine::draw`] onto any [`crate::render::Painter`].
pub struct ChartEngine {
    pub(super) config: ChartEngineConfig,
    pub(super) draw_config: DrawConfig,
    pub(super) fitter: ViewportFitter,
    pub(super) series: IndexMap<SeriesId, SharedSeries>,
    pub(super) axes: IndexMap<AxisId, SharedAxis>,
    pub(super) repaint: RepaintGate,
    pub(super) last_frame: Option<DrawingCache>,
}

impl ChartEngine {
    pub fn new(config: ChartEngineConfig) -> ChartResult<Self> {
        let config = config.validate()?;
        Ok(Self {
            config,
            draw_config: DrawConfig::default(),
            fitter: ViewportFitter::new(config.fit_policy, config.y_scale),
            series: IndexMap::new(),
            axes: IndexMap::new(),
            repaint: RepaintGate::default(),
            last_frame: None,
        })
    }

    #[must_use]
    pub fn config(&self) -> ChartEngineConfig {
        self.config
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.config.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> ChartResult<()> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        self.config.viewport = viewport;
        Ok(())
    }

    pub fn set_paddings(&mut self, paddings: Paddings) -> ChartResult<()> {
        self.config.paddings = paddings.validate()?;
        Ok(())
    }

    pub fn set_y_scale(&mut self, y_scale: f64) -> ChartResult<()> {
        let config = self.config.with_y_scale(y_scale).validate()?;
        self.config = config;
        self.fitter.set_scale_ratio(y_scale);
        Ok(())
    }

    pub fn set_fit_policy(&mut self, fit_policy: FitPolicy) -> ChartResult<()> {
        let fit_policy = fit_policy.validate()?;
        self.config.fit_policy = fit_policy;
        self.fitter.set_policy(fit_policy);
        Ok(())
    }

    /// Device rect left after the padding insets.
    #[must_use]
    pub fn plot_area(&self) -> Rect {
        self.config.paddings.inset(self.config.viewport.rect())
    }

    /// Sets the visible index window `[begin, end)` used by the next frame.
    pub fn set_x_range(&mut self, begin: usize, end: usize) {
        self.draw_config.begin = begin;
        self.draw_config.end = end;
    }

    #[must_use]
    pub fn x_range(&self) -> (usize, usize) {
        (self.draw_config.begin, self.draw_config.end)
    }

    /// Live draw parameters; the value range is the last committed one.
    #[must_use]
    pub fn draw_config(&self) -> DrawConfig {
        self.draw_config
    }

    #[must_use]
    pub fn committed_range(&self) -> Option<ValueRange> {
        self.fitter.committed()
    }

    #[must_use]
    pub fn fitter(&self) -> &ViewportFitter {
        &self.fitter
    }

    /// Registers a series; adding the same series again returns its id unchanged.
    pub fn add_series<S: SeriesDrawer + 'static>(&mut self, series: Rc<RefCell<S>>) -> SeriesId {
        let id = series.borrow().id();
        if !self.series.contains_key(&id) {
            debug!(series = id.raw(), "register series");
            self.series.insert(id, series);
        }
        id
    }

    pub fn remove_series(&mut self, id: SeriesId) -> bool {
        self.series.shift_remove(&id).is_some()
    }

    #[must_use]
    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    /// Registers an axis; adding the same axis again returns its id unchanged.
    pub fn add_axis<A: AxisDrawer + 'static>(&mut self, axis: Rc<RefCell<A>>) -> AxisId {
        let id = axis.borrow().id();
        if !self.axes.contains_key(&id) {
            debug!(axis = id.raw(), "register axis");
            self.axes.insert(id, axis);
        }
        id
    }

    pub fn remove_axis(&mut self, id: AxisId) -> bool {
        self.axes.shift_remove(&id).is_some()
    }

    #[must_use]
    pub fn axis_count(&self) -> usize {
        self.axes.len()
    }

    /// Returns `true` when the host should schedule a repaint; requests made
    /// while one is pending are coalesced.
    pub fn request_repaint(&mut self) -> bool {
        self.repaint.request()
    }

    #[must_use]
    pub fn has_pending_repaint(&self) -> bool {
        self.repaint.is_pending()
    }

    /// Deadline of a debounced value-range commit the host should draw at.
    #[must_use]
    pub fn next_wakeup(&self) -> Option<Instant> {
        self.fitter.next_wakeup()
    }

    /// Coordinate state of the last drawn frame.
    #[must_use]
    pub fn last_drawing_cache(&self) -> Option<&DrawingCache> {
        self.last_frame.as_ref()
    }

    /// Maps a device point to drawer space using the last frame.
    #[must_use]
    pub fn map_device_to_drawer(&self, point: Point) -> Option<Point> {
        self.last_frame
            .as_ref()
            .map(|cache| cache.device_to_drawer(point))
    }
}
