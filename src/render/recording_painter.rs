use crate::core::{AffineTransform, Point, Rect, Viewport};
use crate::error::ChartResult;
use crate::render::{
    Color, LinePrimitive, PaintStats, Painter, RectPrimitive, RenderFrame, TextMetrics,
    TextPrimitive,
};

/// Headless painter that records device-space primitives.
///
/// Every primitive is validated before it is recorded so tests catch invalid
/// geometry without a real backend.
#[derive(Debug)]
pub struct RecordingPainter {
    frame: RenderFrame,
    transform: AffineTransform,
    stats: PaintStats,
}

impl RecordingPainter {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            frame: RenderFrame::new(viewport),
            transform: AffineTransform::IDENTITY,
            stats: PaintStats::default(),
        }
    }

    #[must_use]
    pub fn frame(&self) -> &RenderFrame {
        &self.frame
    }

    #[must_use]
    pub fn stats(&self) -> PaintStats {
        self.stats
    }

    /// Returns the recorded frame and starts a new, empty one.
    pub fn take_frame(&mut self) -> RenderFrame {
        self.stats = PaintStats::default();
        let viewport = self.frame.viewport;
        std::mem::replace(&mut self.frame, RenderFrame::new(viewport))
    }

    #[must_use]
    pub fn into_frame(self) -> RenderFrame {
        self.frame
    }
}

impl Painter for RecordingPainter {
    fn transform(&self) -> AffineTransform {
        self.transform
    }

    fn set_transform(&mut self, transform: AffineTransform) {
        self.transform = transform;
    }

    fn fill_rects(&mut self, rects: &[Rect], color: Color) -> ChartResult<()> {
        self.stats.fill_calls += 1;
        for rect in rects {
            let device = self.transform.map_rect(*rect);
            let primitive =
                RectPrimitive::filled(device.x, device.y, device.width, device.height, color);
            primitive.validate()?;
            self.frame.rects.push(primitive);
            self.stats.rects_filled += 1;
        }
        Ok(())
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Color) -> ChartResult<()> {
        let from = self.transform.map_point(from);
        let to = self.transform.map_point(to);
        let primitive = LinePrimitive::new(from.x, from.y, to.x, to.y, width, color);
        primitive.validate()?;
        self.frame.lines.push(primitive);
        self.stats.lines_stroked += 1;
        Ok(())
    }

    fn stroke_rect(&mut self, rect: Rect, width: f64, color: Color) -> ChartResult<()> {
        let device = self.transform.map_rect(rect);
        let primitive =
            RectPrimitive::outlined(device.x, device.y, device.width, device.height, color, width);
        primitive.validate()?;
        self.frame.rects.push(primitive);
        self.stats.rects_stroked += 1;
        Ok(())
    }

    fn measure_text(&self, text: &str, font_size_px: f64) -> TextMetrics {
        TextMetrics::estimate(text, font_size_px)
    }

    fn draw_text(
        &mut self,
        text: &str,
        origin: Point,
        font_size_px: f64,
        color: Color,
    ) -> ChartResult<()> {
        let device = self.transform.map_point(origin);
        let primitive = TextPrimitive::new(text, device.x, device.y, font_size_px, color);
        primitive.validate()?;
        self.frame.texts.push(primitive);
        self.stats.texts_drawn += 1;
        Ok(())
    }
}
