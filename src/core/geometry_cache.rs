use std::cell::RefCell;
use std::ops::Range;

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::core::candle::Candle;
use crate::core::data_source::{DataSource, RemovalListener};
use crate::core::geometry::Rect;
use crate::error::ChartResult;
use crate::render::{Color, Painter};

/// Color class of one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    /// Growing candles and positive bars.
    Primary,
    /// Falling candles and non-positive bars.
    Secondary,
}

pub type ItemShapes = SmallVec<[Rect; 2]>;

/// Turns one record into its drawer-space shapes.
///
/// Every item must produce exactly `shapes_per_item()` rects.
pub trait ShapeBuilder {
    type Item;

    fn shapes_per_item(&self) -> usize;

    fn build(&self, index: usize, item: &Self::Item) -> (Bucket, ItemShapes);
}

/// Rect centered in the index cell `[index, index + 1)`.
#[must_use]
pub fn item_rect(index: usize, width: f64, low: f64, high: f64, minimum_height: f64) -> Rect {
    let left = index as f64 + 0.5 - width / 2.0;
    let height = (high - low).abs().max(minimum_height);
    Rect::new(left, low.min(high), width, height)
}

/// Candle body and wick geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandleShapes {
    pub body_width: f64,
    pub line_width: f64,
    pub minimum_box_height: f64,
}

impl Default for CandleShapes {
    fn default() -> Self {
        Self {
            body_width: 0.95,
            line_width: 0.15,
            minimum_box_height: 0.01,
        }
    }
}

impl ShapeBuilder for CandleShapes {
    type Item = Candle;

    fn shapes_per_item(&self) -> usize {
        2
    }

    fn build(&self, index: usize, item: &Candle) -> (Bucket, ItemShapes) {
        let bucket = if item.is_growing() {
            Bucket::Primary
        } else {
            Bucket::Secondary
        };
        let body = item_rect(
            index,
            self.body_width,
            item.open.min(item.close),
            item.open.max(item.close),
            self.minimum_box_height,
        );
        let wick = item_rect(
            index,
            self.line_width,
            item.low,
            item.high,
            self.minimum_box_height,
        );
        (bucket, SmallVec::from_buf([body, wick]))
    }
}

/// Histogram bar geometry spanning `[min(0, v), max(0, v)]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarShapes {
    pub body_width: f64,
}

impl Default for BarShapes {
    fn default() -> Self {
        Self { body_width: 1.0 }
    }
}

impl ShapeBuilder for BarShapes {
    type Item = f64;

    fn shapes_per_item(&self) -> usize {
        1
    }

    /// Non-finite values collapse to an empty bar on the baseline.
    fn build(&self, index: usize, item: &f64) -> (Bucket, ItemShapes) {
        let value = if item.is_finite() { *item } else { 0.0 };
        let bucket = if value > 0.0 {
            Bucket::Primary
        } else {
            Bucket::Secondary
        };
        let rect = item_rect(index, self.body_width, value.min(0.0), value.max(0.0), 0.0);
        let mut shapes = ItemShapes::new();
        shapes.push(rect);
        (bucket, shapes)
    }
}

/// Incremental per-item shape store keyed by append index.
///
/// Both buckets hold `cache_end * shapes_per_item` slots; every slot is `Some`
/// in exactly one bucket, so a visible index window slices both in lockstep.
#[derive(Debug, Clone)]
pub struct GeometryCache<B: ShapeBuilder> {
    builder: B,
    primary: Vec<Option<Rect>>,
    secondary: Vec<Option<Rect>>,
    cache_end: usize,
    use_cache: bool,
}

impl<B: ShapeBuilder> GeometryCache<B> {
    #[must_use]
    pub fn new(builder: B) -> Self {
        Self {
            builder,
            primary: Vec::new(),
            secondary: Vec::new(),
            cache_end: 0,
            use_cache: true,
        }
    }

    #[must_use]
    pub fn with_use_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    pub fn set_use_cache(&mut self, use_cache: bool) {
        self.use_cache = use_cache;
    }

    #[must_use]
    pub fn use_cache(&self) -> bool {
        self.use_cache
    }

    #[must_use]
    pub fn builder(&self) -> &B {
        &self.builder
    }

    /// Replaces the shape builder and drops every cached shape.
    pub fn set_builder(&mut self, builder: B) {
        self.builder = builder;
        self.clear();
    }

    /// Number of items whose shapes are cached.
    #[must_use]
    pub fn cache_end(&self) -> usize {
        self.cache_end
    }

    #[must_use]
    pub fn bucket(&self, bucket: Bucket) -> &[Option<Rect>] {
        match bucket {
            Bucket::Primary => &self.primary,
            Bucket::Secondary => &self.secondary,
        }
    }

    pub fn clear(&mut self) {
        self.primary.clear();
        self.secondary.clear();
        self.cache_end = 0;
    }

    /// Builds shapes for `[cache_end, upto)`.
    ///
    /// # Panics
    ///
    /// Panics when `upto` exceeds the source length.
    pub fn ensure(&mut self, source: &DataSource<B::Item>, upto: usize) {
        assert!(
            upto <= source.len(),
            "geometry cache asked for {upto} items but the data source holds {}",
            source.len()
        );
        if upto <= self.cache_end {
            return;
        }

        let start = self.cache_end;
        let per_item = self.builder.shapes_per_item();
        let additional = (upto - start) * per_item;
        self.primary.reserve(additional);
        self.secondary.reserve(additional);

        for (offset, item) in source.window(start..upto).iter().enumerate() {
            let index = start + offset;
            let (bucket, shapes) = self.builder.build(index, item);
            debug_assert_eq!(shapes.len(), per_item);
            for shape in shapes {
                let (filled, empty) = match bucket {
                    Bucket::Primary => (&mut self.primary, &mut self.secondary),
                    Bucket::Secondary => (&mut self.secondary, &mut self.primary),
                };
                filled.push(Some(shape));
                empty.push(None);
            }
        }

        trace!(from = start, to = upto, "extend geometry cache");
        self.cache_end = upto;
    }

    /// Fills the cached shapes of items `[begin, end)`, one batch per bucket.
    pub fn render(
        &mut self,
        source: &DataSource<B::Item>,
        items: Range<usize>,
        painter: &mut dyn Painter,
        primary_color: Color,
        secondary_color: Color,
    ) -> ChartResult<()> {
        if !self.use_cache {
            self.clear();
        }
        let end = items.end.min(source.len());
        self.ensure(source, end);

        let per_item = self.builder.shapes_per_item();
        let begin = items.start.min(end);
        let slots = begin * per_item..end * per_item;

        for (bucket, color) in [
            (&self.primary, primary_color),
            (&self.secondary, secondary_color),
        ] {
            let rects: Vec<Rect> = bucket[slots.clone()].iter().flatten().copied().collect();
            if !rects.is_empty() {
                painter.fill_rects(&rects, color)?;
            }
        }
        Ok(())
    }
}

impl<B: ShapeBuilder> RemovalListener for RefCell<GeometryCache<B>> {
    fn on_data_removed(&self, removed: Range<usize>) {
        debug!(
            start = removed.start,
            end = removed.end,
            "invalidate geometry cache after removal"
        );
        self.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{BarShapes, Bucket, GeometryCache, item_rect};
    use crate::core::data_source::DataSource;

    #[test]
    fn item_rect_is_centered_in_cell() {
        let rect = item_rect(3, 0.5, 2.0, 1.0, 0.0);
        assert_eq!(rect.x, 3.25);
        assert_eq!(rect.y, 1.0);
        assert_eq!(rect.height, 1.0);
    }

    #[test]
    fn minimum_height_floors_flat_items() {
        let rect = item_rect(0, 1.0, 4.0, 4.0, 0.01);
        assert_eq!(rect.height, 0.01);
    }

    #[test]
    fn bars_split_on_sign() {
        let source = DataSource::with_items(vec![2.0, -1.0, 0.0]);
        let mut cache = GeometryCache::new(BarShapes::default());
        cache.ensure(&source, 3);

        let primary = cache.bucket(Bucket::Primary);
        let secondary = cache.bucket(Bucket::Secondary);
        assert!(primary[0].is_some() && secondary[0].is_none());
        assert!(primary[1].is_none() && secondary[1].is_some());
        assert!(primary[2].is_none() && secondary[2].is_some());

        let negative = secondary[1].expect("negative bar");
        assert_eq!((negative.y, negative.height), (-1.0, 1.0));
    }

    #[test]
    #[should_panic(expected = "geometry cache asked for")]
    fn ensure_past_len_panics() {
        let source = DataSource::with_items(vec![1.0]);
        let mut cache = GeometryCache::new(BarShapes::default());
        cache.ensure(&source, 2);
    }

    #[test]
    fn non_finite_bar_keeps_its_slot_as_baseline_rect() {
        let source = DataSource::with_items(vec![f64::NAN, f64::INFINITY]);
        let mut cache = GeometryCache::new(BarShapes::default());
        cache.ensure(&source, 2);

        for slot in 0..2 {
            let rect = cache.bucket(Bucket::Secondary)[slot].expect("baseline bar");
            assert!(cache.bucket(Bucket::Primary)[slot].is_none());
            assert_eq!((rect.y, rect.height), (0.0, 0.0));
        }
    }
}
