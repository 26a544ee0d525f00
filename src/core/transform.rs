use serde::{Deserialize, Serialize};

use crate::core::draw_config::DrawConfig;
use crate::core::geometry::{AffineTransform, Point, Rect};
use crate::error::{ChartError, ChartResult};

/// Builds the drawer-to-device transform for one frame.
///
/// Composition order: move the drawer origin to `(0, 0)`, scale each axis
/// independently, move to the mirrored plot origin, then flip vertically
/// inside the device (`y -> device_height - y`). After the flip the drawer
/// floor lands on `plot_area.bottom()` and the drawer ceiling on
/// `plot_area.top()`.
///
/// Zero, negative or non-finite spans in either rectangle are clamped to 1
/// so the result is never singular.
#[must_use]
pub fn coordinate_transform(
    drawer_area: Rect,
    plot_area: Rect,
    device_height: f64,
) -> AffineTransform {
    let scale_x = sanitize_span(plot_area.width) / sanitize_span(drawer_area.width);
    let scale_y = sanitize_span(plot_area.height) / sanitize_span(drawer_area.height);

    AffineTransform::translation(-drawer_area.left(), -drawer_area.top())
        .then(AffineTransform::scale(scale_x, scale_y))
        .then(AffineTransform::translation(
            plot_area.left(),
            device_height - plot_area.bottom(),
        ))
        .then(AffineTransform::mirror_vertical())
        .then(AffineTransform::translation(0.0, device_height))
}

fn sanitize_span(span: f64) -> f64 {
    if span.is_finite() && span > 0.0 {
        span
    } else {
        1.0
    }
}

/// Immutable per-frame coordinate state shared by axes and series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawingCache {
    pub drawer_area: Rect,
    pub plot_area: Rect,
    pub drawer_to_device: AffineTransform,
    pub device_to_drawer: AffineTransform,
}

impl DrawingCache {
    /// Computes the frame's rectangles and both transform directions.
    pub fn build(config: &DrawConfig, plot_area: Rect, device_height: f64) -> ChartResult<Self> {
        let raw = config.drawer_area();
        let drawer_area = Rect::new(
            raw.x,
            raw.y,
            sanitize_span(raw.width),
            sanitize_span(raw.height),
        );
        let drawer_to_device = coordinate_transform(drawer_area, plot_area, device_height);
        let device_to_drawer = drawer_to_device.inverse().ok_or_else(|| {
            ChartError::InvalidData(format!(
                "coordinate transform is singular for drawer area {drawer_area:?}"
            ))
        })?;

        Ok(Self {
            drawer_area,
            plot_area,
            drawer_to_device,
            device_to_drawer,
        })
    }

    #[must_use]
    pub fn drawer_to_device(&self, point: Point) -> Point {
        self.drawer_to_device.map_point(point)
    }

    #[must_use]
    pub fn device_to_drawer(&self, point: Point) -> Point {
        self.device_to_drawer.map_point(point)
    }

    #[must_use]
    pub fn drawer_x_to_device(&self, x: f64) -> f64 {
        self.drawer_to_device(Point::new(x, 0.0)).x
    }

    #[must_use]
    pub fn drawer_y_to_device(&self, y: f64) -> f64 {
        self.drawer_to_device(Point::new(0.0, y)).y
    }

    /// Converts a horizontal device length into drawer units.
    #[must_use]
    pub fn device_width_to_drawer(&self, width: f64) -> f64 {
        width * self.drawer_area.width / sanitize_span(self.plot_area.width)
    }

    /// Converts a vertical device length into drawer units.
    #[must_use]
    pub fn device_height_to_drawer(&self, height: f64) -> f64 {
        height * self.drawer_area.height / sanitize_span(self.plot_area.height)
    }
}

#[cfg(test)]
mod tests {
    use super::{DrawingCache, coordinate_transform};
    use crate::core::draw_config::DrawConfig;
    use crate::core::geometry::{Point, Rect};

    #[test]
    fn drawer_corners_land_on_plot_corners() {
        let plot = Rect::new(80.0, 20.0, 400.0, 300.0);
        let t = coordinate_transform(Rect::new(0.0, 10.0, 20.0, 5.0), plot, 400.0);

        let floor = t.map_point(Point::new(0.0, 10.0));
        assert!((floor.x - plot.left()).abs() <= 1e-9);
        assert!((floor.y - plot.bottom()).abs() <= 1e-9);

        let ceiling = t.map_point(Point::new(20.0, 15.0));
        assert!((ceiling.x - plot.right()).abs() <= 1e-9);
        assert!((ceiling.y - plot.top()).abs() <= 1e-9);
    }

    #[test]
    fn zero_spans_are_clamped() {
        let config = DrawConfig::new(3, 3, 5.0, 5.0);
        let cache = DrawingCache::build(&config, Rect::new(0.0, 0.0, 100.0, 100.0), 100.0)
            .expect("clamped transform is invertible");
        assert_eq!(cache.drawer_area.width, 1.0);
        assert_eq!(cache.drawer_area.height, 1.0);
    }

    #[test]
    fn length_conversion_uses_plot_ratio() {
        let config = DrawConfig::new(0, 50, 0.0, 10.0);
        let cache = DrawingCache::build(&config, Rect::new(0.0, 0.0, 500.0, 200.0), 200.0)
            .expect("cache");
        assert!((cache.device_width_to_drawer(10.0) - 1.0).abs() <= 1e-12);
        assert!((cache.device_height_to_drawer(20.0) - 1.0).abs() <= 1e-12);
    }
}
