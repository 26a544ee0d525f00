use std::cell::RefCell;
use std::rc::Rc;

use crate::core::{Candle, DataSource, SharedDataSource};

/// Maps a tick value to its label text; an empty string draws nothing.
pub type LabelFormatterFn = Rc<dyn Fn(f64) -> String + 'static>;

pub const DEFAULT_LABEL_PRECISION: usize = 2;
pub const DEFAULT_CANDLE_DATE_FORMAT: &str = "%Y-%m-%d";

#[must_use]
pub fn default_label_formatter() -> LabelFormatterFn {
    fixed_decimals_formatter(DEFAULT_LABEL_PRECISION)
}

#[must_use]
pub fn fixed_decimals_formatter(precision: usize) -> LabelFormatterFn {
    Rc::new(move |value: f64| format!("{value:.precision$}"))
}

/// Formats an index tick with the timestamp of the candle at that index.
///
/// The source is held weakly; indices outside the source (or a dropped
/// source) produce empty labels.
#[must_use]
pub fn candle_date_label_formatter(
    source: &SharedDataSource<Candle>,
    format: impl Into<String>,
) -> LabelFormatterFn {
    let source = Rc::downgrade(source);
    let format = format.into();
    Rc::new(move |value: f64| {
        source
            .upgrade()
            .and_then(|source| candle_date_label(&source, value, &format))
            .unwrap_or_default()
    })
}

fn candle_date_label(
    source: &RefCell<DataSource<Candle>>,
    value: f64,
    format: &str,
) -> Option<String> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    let index = value.floor() as usize;
    let source = source.borrow();
    let candle = source.get(index)?;
    Some(candle.timestamp.format(format).to_string())
}
