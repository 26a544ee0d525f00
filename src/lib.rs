//! chart-stream: streaming candlestick and histogram chart engine.
//!
//! The crate maps a visible window of an append-only series into device
//! pixels, auto-fits the value range with debouncing, lays out value and bar
//! axes, and caches per-item geometry so new data costs only the new items.
//! Drawing goes through the [`render::Painter`] trait; a headless recording
//! painter is always available and Cairo/GTK4 backends are feature-gated.

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;

#[cfg(feature = "gtk4-adapter")]
pub mod platform_gtk;

pub use api::{ChartEngine, ChartEngineConfig};
pub use error::{ChartError, ChartResult};
