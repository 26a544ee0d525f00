use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::core::{DrawConfig, ValueRange};
use crate::error::ChartResult;
use crate::render::Painter;

static NEXT_SERIES_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a registered series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeriesId(u64);

impl SeriesId {
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_SERIES_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// A data series drawn inside the plot area.
///
/// `draw` receives a painter already switched to drawer space: x is the item
/// index and y the value.
pub trait SeriesDrawer {
    fn id(&self) -> SeriesId;

    /// Value range this series needs over `[config.begin, config.end)`.
    ///
    /// `None` when the series has no visible data or lost its source.
    fn preferred_range(&self, config: &DrawConfig) -> Option<ValueRange>;

    /// Copy of `config` carrying this series' preferred value range.
    fn prepare(&self, config: &DrawConfig) -> DrawConfig {
        match self.preferred_range(config) {
            Some(range) => config.with_value_range(range),
            None => *config,
        }
    }

    fn draw(&mut self, config: &DrawConfig, painter: &mut dyn Painter) -> ChartResult<()>;
}
