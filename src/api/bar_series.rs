use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::{
    BarShapes, DataSource, DrawConfig, GeometryCache, RemovalListener, SharedDataSource,
    ValueRange,
};
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, Painter};

use super::{SeriesDrawer, SeriesId};

/// Histogram bar width and colors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarStyle {
    pub body_width: f64,
    pub positive_color: Color,
    pub negative_color: Color,
    pub use_cache: bool,
}

impl Default for BarStyle {
    fn default() -> Self {
        Self {
            body_width: BarShapes::default().body_width,
            positive_color: Color::RED,
            negative_color: Color::GREEN,
            use_cache: true,
        }
    }
}

impl BarStyle {
    pub fn validate(self) -> ChartResult<Self> {
        if !self.body_width.is_finite() || self.body_width <= 0.0 || self.body_width > 1.0 {
            return Err(ChartError::InvalidConfig(
                "bar body width must be finite and in (0, 1]".to_owned(),
            ));
        }
        self.positive_color.validate()?;
        self.negative_color.validate()?;
        Ok(self)
    }
}

/// Histogram series over scalar values; bars grow from zero.
pub struct BarSeries {
    id: SeriesId,
    source: Weak<RefCell<DataSource<f64>>>,
    cache: Rc<RefCell<GeometryCache<BarShapes>>>,
    style: BarStyle,
    detached_reported: Cell<bool>,
}

impl BarSeries {
    pub fn new(source: &SharedDataSource<f64>, style: BarStyle) -> ChartResult<Self> {
        let style = style.validate()?;
        let shapes = BarShapes {
            body_width: style.body_width,
        };
        let cache = Rc::new(RefCell::new(
            GeometryCache::new(shapes).with_use_cache(style.use_cache),
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
    pub fn style(&self) -> BarStyle {
        self.style
    }

    pub fn set_style(&mut self, style: BarStyle) -> ChartResult<()> {
        let style = style.validate()?;
        let mut cache = self.cache.borrow_mut();
        if style.body_width != self.style.body_width {
            cache.set_builder(BarShapes {
                body_width: style.body_width,
            });
        }
        cache.set_use_cache(style.use_cache);
        self.style = style;
        Ok(())
    }

    #[must_use]
    pub fn geometry_cache(&self) -> std::cell::Ref<'_, GeometryCache<BarShapes>> {
        self.cache.borrow()
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.source.strong_count() > 0
    }

    fn attached_source(&self) -> Option<SharedDataSource<f64>> {
        let source = self.source.upgrade();
        if source.is_none() && !self.detached_reported.replace(true) {
            warn!(series = self.id.raw(), "bar series lost its data source");
        }
        source
    }
}

impl SeriesDrawer for BarSeries {
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
        let finite = move || {
            visible
                .iter()
                .copied()
                .filter(|value| value.is_finite())
                .map(OrderedFloat)
        };
        let low = finite().min()?;
        let high = finite().max()?;
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
            self.style.positive_color,
            self.style.negative_color,
        )
    }
}
