use serde::{Deserialize, Serialize};

/// Direction an axis runs along the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    #[must_use]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Horizontal)
    }
}

/// Relative tolerance (in steps) used when comparing a tick against `end`.
const TICK_END_EPSILON: f64 = 1e-9;

/// Lazy, finite sequence `begin, begin + step, ...` strictly below `end`.
///
/// Values are computed as `begin + k * step` rather than by accumulation so
/// rounding drift never produces an extra tick at `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSequence {
    begin: f64,
    end: f64,
    step: f64,
    index: usize,
}

impl TickSequence {
    /// Splits `[begin, end)` into `tick_count` equal steps.
    ///
    /// `tick_count == 0` and empty or non-finite ranges yield nothing.
    #[must_use]
    pub fn new(begin: f64, end: f64, tick_count: usize) -> Self {
        let step = if tick_count == 0 {
            0.0
        } else {
            (end - begin) / tick_count as f64
        };
        Self::with_step(begin, end, step)
    }

    #[must_use]
    pub fn with_step(begin: f64, end: f64, step: f64) -> Self {
        Self {
            begin,
            end,
            step,
            index: 0,
        }
    }

    /// Drops the first tick by moving `begin` one step forward.
    #[must_use]
    pub fn skip_first(mut self) -> Self {
        self.begin += self.step;
        self
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    fn is_productive(&self) -> bool {
        self.begin.is_finite() && self.end.is_finite() && self.step.is_finite() && self.step > 0.0
    }
}

impl Iterator for TickSequence {
    type Item = f64;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.is_productive() {
            return None;
        }
        let value = self.begin + self.index as f64 * self.step;
        if value >= self.end - self.step * TICK_END_EPSILON {
            return None;
        }
        self.index += 1;
        Some(value)
    }
}
