use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::{
    Candle, CandleShapes, DataSource, DrawConfig, GeometryCache, RemovalListener,
    SharedDataSource, ValueRange,
};
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, Painter};

use super::{SeriesDrawer, SeriesId};

/// Candle geometry and colors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandleStyle {
    pub body_width: f64,
    pub line_width: f64,
    pub minimum_box_height: f64,
    pub growing_color: Color,
    pub falling_color: Color,
    pub use_cache: bool,
}

impl Default for CandleStyle {
    fn default() -> Self {
        let shapes = CandleShapes::default();
        Self {
            body_width: shapes.body_width,
            line_width: shapes.line_width,
            minimum_box_height: shapes.minimum_box_height,
            growing_color: Color::RED,
            falling_color: Color::GREEN,
            use_cache: true,
        }
    }
}

impl CandleStyle {
    pub fn validate(self) -> ChartResult<Self> {
        for (name, value) in [
            ("body_width", self.body_width),
            ("line_width", self.line_width),
        ] {
            if !value.is_finite() || value <= 0.0 || value > 1.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "candle `{name}` must be finite and in (0, 1]"
                )));
            }
        }
        if !self.minimum_box_height.is_finite() || self.minimum_box_height < 0.0 {
            return Err(ChartError::InvalidConfig(
                "candle minimum box height must be finite and >= 0".to_owned(),
            ));
        }
        self.growing_color.validate()?;
        self.falling_color.validate()?;
        Ok(self)
    }

    fn shapes(self) -> CandleShapes {
        CandleShapes {
            body_width: self.body_width,
            line_width: self.line_width,
            minimum_box_height: self.minimum_box_height,
        }
    }
}

/// Candlestick series backed by a shared [`DataSource`] of candles.
pub struct CandleSeries {
    id: SeriesId,
    source: Weak<RefCell<DataSource<Candle>>>,
    cache: Rc<RefCell<GeometryCache<CandleShapes>>>,
    style: CandleStyle,
    detached_reported: Cell<bool>,
}

impl CandleSeries {
    pub fn new(source: &SharedDataSource<Candle>, style: CandleStyle) -> ChartResult<Self> {
        let style = style.validate()?;
        let cache = Rc::new(RefCell::new(
            GeometryCache::new(style.shapes()).with_use_cache(style.use_cache),
        ));
        let weak_cache = Rc::downgrade(&cache);
        let listener: Weak<dyn RemovalListener> = weak_cache;
        source.borrow_mut().subscribe_removal(listener);

        Ok(Self {
            id: SeriesId::next(),
            source: Rc::downgrade(source),
            cache,
            style,
            detached_reported: Cell::new(false),
        })
    }

    #[must_use]
    pub fn style(&self) -> CandleStyle {
        self.style
    }

    /// Applies a new style; geometry changes drop cached shapes.
    pub fn set_style(&mut self, style: CandleStyle) -> ChartResult<()> {
        let style = style.validate()?;
        let mut cache = self.cache.borrow_mut();
        if style.shapes() != self.style.shapes() {
            cache.set_builder(style.shapes());
        }
        cache.set_use_cache(style.use_cache);
        self.style = style;
        Ok(())
    }

    /// Read access to the per-item shape cache.
    #[must_use]
    pub fn geometry_cache(&self) -> std::cell::Ref<'_, GeometryCache<CandleShapes>> {
        self.cache.borrow()
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.source.strong_count() > 0
    }

    fn attached_source(&self) -> Option<SharedDataSource<Candle>> {
        let source = self.source.upgrade();
        if source.is_none() && !self.detached_reported.replace(true) {
            warn!(series = self.id.raw(), "candle series lost its data source");
        }
        source
    }
}

impl SeriesDrawer for CandleSeries {
    fn id(&self) -> SeriesId {
        self.id
    }

    fn preferred_range(&self, config: &DrawConfig) -> Option<ValueRange> {
        if !config.has_showing_data() {
            return None;
        }
        let source = self.attached_source()?;
        let source = source.borrow();
        let visible = source.window(config.begin..config.end);
        let low = visible.iter().map(|candle| OrderedFloat(candle.low)).min()?;
        let high = visible.iter().map(|candle| OrderedFloat(candle.high)).max()?;
        Some(ValueRange::new(low.into_inner(), high.into_inner()))
    }

    fn draw(&mut self, config: &DrawConfig, painter: &mut dyn Painter) -> ChartResult<()> {
        if !config.has_showing_data() {
            return Ok(());
        }
        let Some(source) = self.attached_source() else {
            return Ok(());
        };
        let source = source.borrow();
        self.cache.borrow_mut().render(
            &source,
            config.begin..config.end,
            painter,
            self.style.growing_color,
            self.style.falling_color,
        )
    }
}
