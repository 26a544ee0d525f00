mod axis;
mod axis_config;
mod bar_axis;
mod bar_series;
mod candle_series;
mod draw_pipeline;
mod engine;
mod engine_config;
mod json_contract;
mod label_format;
mod repaint_gate;
mod series;
mod value_axis;

pub use axis::{AxisDrawer, AxisId, BarInfo, TickInfo};
pub use axis_config::{AxisConfig, AxisStyle, TickAnchor};
pub use bar_axis::BarAxis;
pub use bar_series::{BarSeries, BarStyle};
pub use candle_series::{CandleSeries, CandleStyle};
pub use engine::ChartEngine;
pub use engine_config::{ChartEngineConfig, PlotBorderStyle};
pub use json_contract::{ENGINE_CONFIG_JSON_SCHEMA_V1, EngineConfigJsonContractV1};
pub use label_format::{
    DEFAULT_CANDLE_DATE_FORMAT, DEFAULT_LABEL_PRECISION, LabelFormatterFn,
    candle_date_label_formatter, default_label_formatter, fixed_decimals_formatter,
};
pub use repaint_gate::RepaintGate;
pub use series::{SeriesDrawer, SeriesId};
pub use value_axis::ValueAxis;
