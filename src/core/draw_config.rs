use serde::{Deserialize, Serialize};

use crate::core::geometry::Rect;

/// Per-frame drawing parameters.
///
/// `[begin, end)` is the visible index window and `[y_low, y_high)` the
/// committed value range. The type is `Copy` so every frame works on its own
/// snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawConfig {
    pub begin: usize,
    pub end: usize,
    pub y_low: f64,
    pub y_high: f64,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            begin: 0,
            end: 10,
            y_low: 0.0,
            y_high: 1.0,
        }
    }
}

impl DrawConfig {
    #[must_use]
    pub const fn new(begin: usize, end: usize, y_low: f64, y_high: f64) -> Self {
        Self {
            begin,
            end,
            y_low,
            y_high,
        }
    }

    /// `false` for empty or inverted windows, which are skipped rather than drawn.
    #[must_use]
    pub fn has_showing_data(self) -> bool {
        self.end > self.begin
    }

    #[must_use]
    pub fn visible_len(self) -> usize {
        self.end.saturating_sub(self.begin)
    }

    #[must_use]
    pub fn value_range(self) -> ValueRange {
        ValueRange::new(self.y_low, self.y_high)
    }

    #[must_use]
    pub fn with_value_range(mut self, range: ValueRange) -> Self {
        self.y_low = range.low;
        self.y_high = range.high;
        self
    }

    /// Data-space rectangle `(begin, y_low, end - begin, y_high - y_low)`.
    #[must_use]
    pub fn drawer_area(self) -> Rect {
        let begin = self.begin as f64;
        Rect::new(
            begin,
            self.y_low,
            self.end as f64 - begin,
            self.y_high - self.y_low,
        )
    }
}

/// Closed value interval reported by series and committed by the fitter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub low: f64,
    pub high: f64,
}

impl ValueRange {
    #[must_use]
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.high - self.low
    }

    #[must_use]
    pub fn mid(self) -> f64 {
        (self.low + self.high) / 2.0
    }

    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self::new(self.low.min(other.low), self.high.max(other.high))
    }

    #[must_use]
    pub fn contains_range(self, other: Self) -> bool {
        other.low >= self.low && other.high <= self.high
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.low.is_finite() && self.high.is_finite()
    }

    /// Scales the interval around its midpoint.
    #[must_use]
    pub fn scaled_from_mid(self, ratio: f64) -> Self {
        let mid = self.mid();
        let half = self.span() / 2.0 * ratio;
        Self::new(mid - half, mid + half)
    }
}
