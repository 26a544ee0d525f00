pub mod candle;
pub mod data_source;
pub mod draw_config;
pub mod geometry;
pub mod geometry_cache;
pub mod ticks;
pub mod transform;
pub mod types;
pub mod viewport_fitter;

pub use candle::Candle;
pub use data_source::{DataSource, RemovalListener, SharedDataSource};
pub use draw_config::{DrawConfig, ValueRange};
pub use geometry::{AffineTransform, Point, Rect};
pub use geometry_cache::{
    BarShapes, Bucket, CandleShapes, GeometryCache, ItemShapes, ShapeBuilder, item_rect,
};
pub use ticks::{Orientation, TickSequence};
pub use transform::{DrawingCache, coordinate_transform};
pub use types::{Paddings, Viewport};
pub use viewport_fitter::{DebounceConfig, FitPolicy, FitState, ViewportFitter};
