use std::ops::{Deref, DerefMut};

use crate::core::{AffineTransform, Point, Rect};
use crate::error::ChartResult;
use crate::render::Color;

/// Measured extent of one label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
}

impl TextMetrics {
    /// Deterministic, backend-independent text size estimate.
    #[must_use]
    pub fn estimate(text: &str, font_size_px: f64) -> Self {
        let units = text.chars().fold(0.0, |acc, ch| {
            acc + match ch {
                '0'..='9' => 0.62,
                '.' | ',' => 0.34,
                '-' | '+' | '%' => 0.42,
                ' ' => 0.33,
                _ => 0.58,
            }
        });
        Self {
            width: (units * font_size_px).max(font_size_px),
            height: font_size_px * 1.2,
        }
    }
}

/// Counters kept by painters for the last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaintStats {
    pub fill_calls: usize,
    pub rects_filled: usize,
    pub lines_stroked: usize,
    pub rects_stroked: usize,
    pub texts_drawn: usize,
}

/// Paint context driven by the draw pipeline.
///
/// Geometry passed to a painter is in the painter's current user space; the
/// current transform maps it to device pixels.
pub trait Painter {
    fn transform(&self) -> AffineTransform;

    fn set_transform(&mut self, transform: AffineTransform);

    /// Fills every rect with one color in a single batch.
    fn fill_rects(&mut self, rects: &[Rect], color: Color) -> ChartResult<()>;

    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Color) -> ChartResult<()>;

    fn stroke_rect(&mut self, rect: Rect, width: f64, color: Color) -> ChartResult<()>;

    fn measure_text(&self, text: &str, font_size_px: f64) -> TextMetrics;

    /// Draws `text` with its top-left corner at `origin`.
    fn draw_text(
        &mut self,
        text: &str,
        origin: Point,
        font_size_px: f64,
        color: Color,
    ) -> ChartResult<()>;
}

/// Restores the painter transform captured at construction when dropped.
///
/// Early returns through `?` restore the transform as well.
pub struct TransformGuard<'a, P: Painter + ?Sized> {
    painter: &'a mut P,
    saved: AffineTransform,
}

impl<'a, P: Painter + ?Sized> TransformGuard<'a, P> {
    #[must_use]
    pub fn new(painter: &'a mut P) -> Self {
        let saved = painter.transform();
        Self { painter, saved }
    }

    /// Translates user space by `(dx, dy)` for the guard's lifetime.
    #[must_use]
    pub fn translated(painter: &'a mut P, dx: f64, dy: f64) -> Self {
        let guard = Self::new(painter);
        let next = guard.saved.translated(dx, dy);
        guard.painter.set_transform(next);
        guard
    }

    /// Prepends `transform` (e.g. drawer to device) to the current transform.
    #[must_use]
    pub fn concatenated(painter: &'a mut P, transform: AffineTransform) -> Self {
        let guard = Self::new(painter);
        let next = transform.then(guard.saved);
        guard.painter.set_transform(next);
        guard
    }

    #[must_use]
    pub fn saved_transform(&self) -> AffineTransform {
        self.saved
    }
}

impl<P: Painter + ?Sized> Deref for TransformGuard<'_, P> {
    type Target = P;

    fn deref(&self) -> &Self::Target {
        self.painter
    }
}

impl<P: Painter + ?Sized> DerefMut for TransformGuard<'_, P> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.painter
    }
}

impl<P: Painter + ?Sized> Drop for TransformGuard<'_, P> {
    fn drop(&mut self) {
        self.painter.set_transform(self.saved);
    }
}

#[cfg(test)]
mod tests {
    use super::TextMetrics;

    #[test]
    fn estimate_is_at_least_one_em() {
        let metrics = TextMetrics::estimate("1", 12.0);
        assert_eq!(metrics.width, 12.0);
        assert!(TextMetrics::estimate("100.00", 12.0).width > metrics.width);
    }
}
