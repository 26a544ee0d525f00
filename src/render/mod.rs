mod frame;
mod painter;
mod primitives;
mod recording_painter;

pub use frame::RenderFrame;
pub use painter::{PaintStats, Painter, TextMetrics, TransformGuard};
pub use primitives::{Color, LinePrimitive, RectPrimitive, TextPrimitive};
pub use recording_painter::RecordingPainter;

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoPainter, create_image_surface};
