use cairo::{Context, Format, ImageSurface, Matrix};
use pango::FontDescription;

use crate::core::{AffineTransform, Point, Rect};
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, PaintStats, Painter, TextMetrics};

/// Cairo + Pango + PangoCairo painter.
///
/// The painter transform is composed with the context matrix found at
/// construction, so it can draw inside a GTK `DrawingArea` callback whose
/// context already carries a device offset.
#[derive(Debug)]
pub struct CairoPainter<'a> {
    context: &'a Context,
    base_matrix: Matrix,
    transform: AffineTransform,
    stats: PaintStats,
}

impl<'a> CairoPainter<'a> {
    #[must_use]
    pub fn new(context: &'a Context) -> Self {
        Self {
            context,
            base_matrix: context.matrix(),
            transform: AffineTransform::IDENTITY,
            stats: PaintStats::default(),
        }
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo+pango+pangocairo"
    }

    #[must_use]
    pub fn stats(&self) -> PaintStats {
        self.stats
    }

    /// Paints the whole clip region with `color`.
    pub fn clear(&mut self, color: Color) -> ChartResult<()> {
        color.validate()?;
        apply_color(self.context, color);
        self.context
            .paint()
            .map_err(|err| map_backend_error("failed to clear surface", err))
    }

    fn layout(&self, text: &str, font_size_px: f64) -> pango::Layout {
        let layout = pangocairo::functions::create_layout(self.context);
        let font_description = FontDescription::from_string(&format!("Sans {font_size_px}"));
        layout.set_font_description(Some(&font_description));
        layout.set_text(text);
        layout
    }
}

/// Creates an ARGB32 image surface for offscreen painting.
pub fn create_image_surface(width: i32, height: i32) -> ChartResult<ImageSurface> {
    if width <= 0 || height <= 0 {
        return Err(ChartError::InvalidViewport {
            width: width.max(0).unsigned_abs(),
            height: height.max(0).unsigned_abs(),
        });
    }
    ImageSurface::create(Format::ARgb32, width, height)
        .map_err(|err| map_backend_error("failed to create cairo surface", err))
}

impl Painter for CairoPainter<'_> {
    fn transform(&self) -> AffineTransform {
        self.transform
    }

    fn set_transform(&mut self, transform: AffineTransform) {
        self.transform = transform;
        let user = Matrix::new(
            transform.m11,
            transform.m12,
            transform.m21,
            transform.m22,
            transform.dx,
            transform.dy,
        );
        self.context
            .set_matrix(Matrix::multiply(&user, &self.base_matrix));
    }

    fn fill_rects(&mut self, rects: &[Rect], color: Color) -> ChartResult<()> {
        self.stats.fill_calls += 1;
        if rects.is_empty() {
            return Ok(());
        }
        for rect in rects {
            self.context
                .rectangle(rect.x, rect.y, rect.width, rect.height);
        }
        apply_color(self.context, color);
        self.context
            .fill()
            .map_err(|err| map_backend_error("failed to fill rectangles", err))?;
        self.stats.rects_filled += rects.len();
        Ok(())
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Color) -> ChartResult<()> {
        apply_color(self.context, color);
        self.context.set_line_width(width);
        self.context.move_to(from.x, from.y);
        self.context.line_to(to.x, to.y);
        self.context
            .stroke()
            .map_err(|err| map_backend_error("failed to stroke line", err))?;
        self.stats.lines_stroked += 1;
        Ok(())
    }

    fn stroke_rect(&mut self, rect: Rect, width: f64, color: Color) -> ChartResult<()> {
        apply_color(self.context, color);
        self.context.set_line_width(width);
        self.context
            .rectangle(rect.x, rect.y, rect.width, rect.height);
        self.context
            .stroke()
            .map_err(|err| map_backend_error("failed to stroke rectangle", err))?;
        self.stats.rects_stroked += 1;
        Ok(())
    }

    fn measure_text(&self, text: &str, font_size_px: f64) -> TextMetrics {
        let (width, height) = self.layout(text, font_size_px).pixel_size();
        TextMetrics {
            width: f64::from(width),
            height: f64::from(height),
        }
    }

    fn draw_text(
        &mut self,
        text: &str,
        origin: Point,
        font_size_px: f64,
        color: Color,
    ) -> ChartResult<()> {
        let layout = self.layout(text, font_size_px);
        apply_color(self.context, color);
        self.context.move_to(origin.x, origin.y);
        pangocairo::functions::show_layout(self.context, &layout);
        self.stats.texts_drawn += 1;
        Ok(())
    }
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::Backend(format!("{prefix}: {err}"))
}
