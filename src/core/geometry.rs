use serde::{Deserialize, Serialize};

/// Point in either drawer (data) space or device (pixel) space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned rectangle stored as origin plus size.
///
/// `y` is the smaller vertical coordinate: the visual top in device space and
/// the value floor in drawer space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    #[must_use]
    pub fn left(self) -> f64 {
        self.x
    }

    #[must_use]
    pub fn top(self) -> f64 {
        self.y
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn top_left(self) -> Point {
        Point::new(self.left(), self.top())
    }

    #[must_use]
    pub fn bottom_right(self) -> Point {
        Point::new(self.right(), self.bottom())
    }

    /// Moves each edge by the given deltas, like `QRectF::adjusted`.
    #[must_use]
    pub fn adjusted(self, dl: f64, dt: f64, dr: f64, db: f64) -> Self {
        Self::from_edges(
            self.left() + dl,
            self.top() + dt,
            self.right() + dr,
            self.bottom() + db,
        )
    }

    /// Returns the same area with non-negative width and height.
    #[must_use]
    pub fn normalized(self) -> Self {
        let (left, right) = if self.width < 0.0 {
            (self.right(), self.left())
        } else {
            (self.left(), self.right())
        };
        let (top, bottom) = if self.height < 0.0 {
            (self.bottom(), self.top())
        } else {
            (self.top(), self.bottom())
        };
        Self::from_edges(left, top, right, bottom)
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

/// 2D affine transform using row-vector convention:
///
/// `x' = m11 * x + m21 * y + dx`
/// `y' = m12 * x + m22 * y + dy`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    pub m11: f64,
    pub m12: f64,
    pub m21: f64,
    pub m22: f64,
    pub dx: f64,
    pub dy: f64,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineTransform {
    pub const IDENTITY: Self = Self {
        m11: 1.0,
        m12: 0.0,
        m21: 0.0,
        m22: 1.0,
        dx: 0.0,
        dy: 0.0,
    };

    #[must_use]
    pub const fn translation(dx: f64, dy: f64) -> Self {
        Self {
            dx,
            dy,
            ..Self::IDENTITY
        }
    }

    #[must_use]
    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self {
            m11: sx,
            m22: sy,
            ..Self::IDENTITY
        }
    }

    /// Mirror about the horizontal axis (`y -> -y`).
    #[must_use]
    pub const fn mirror_vertical() -> Self {
        Self::scale(1.0, -1.0)
    }

    /// Composes `self` followed by `next`.
    #[must_use]
    pub fn then(self, next: Self) -> Self {
        Self {
            m11: self.m11 * next.m11 + self.m12 * next.m21,
            m12: self.m11 * next.m12 + self.m12 * next.m22,
            m21: self.m21 * next.m11 + self.m22 * next.m21,
            m22: self.m21 * next.m12 + self.m22 * next.m22,
            dx: self.dx * next.m11 + self.dy * next.m21 + next.dx,
            dy: self.dx * next.m12 + self.dy * next.m22 + next.dy,
        }
    }

    /// Translates the local coordinate system before applying `self`.
    #[must_use]
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self::translation(dx, dy).then(self)
    }

    #[must_use]
    pub fn determinant(self) -> f64 {
        self.m11 * self.m22 - self.m12 * self.m21
    }

    /// Exact matrix inverse, `None` for singular or non-finite transforms.
    #[must_use]
    pub fn inverse(self) -> Option<Self> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }

        let m11 = self.m22 / det;
        let m12 = -self.m12 / det;
        let m21 = -self.m21 / det;
        let m22 = self.m11 / det;
        Some(Self {
            m11,
            m12,
            m21,
            m22,
            dx: -(m11 * self.dx + m21 * self.dy),
            dy: -(m12 * self.dx + m22 * self.dy),
        })
    }

    #[must_use]
    pub fn map_point(self, point: Point) -> Point {
        Point::new(
            self.m11 * point.x + self.m21 * point.y + self.dx,
            self.m12 * point.x + self.m22 * point.y + self.dy,
        )
    }

    /// Maps a rectangle and returns the normalized bounding box of its corners.
    #[must_use]
    pub fn map_rect(self, rect: Rect) -> Rect {
        let corners = [
            self.map_point(Point::new(rect.left(), rect.top())),
            self.map_point(Point::new(rect.right(), rect.top())),
            self.map_point(Point::new(rect.left(), rect.bottom())),
            self.map_point(Point::new(rect.right(), rect.bottom())),
        ];
        let mut left = f64::INFINITY;
        let mut top = f64::INFINITY;
        let mut right = f64::NEG_INFINITY;
        let mut bottom = f64::NEG_INFINITY;
        for corner in corners {
            left = left.min(corner.x);
            right = right.max(corner.x);
            top = top.min(corner.y);
            bottom = bottom.max(corner.y);
        }
        Rect::from_edges(left, top, right, bottom)
    }

    #[must_use]
    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }
}
