use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// One OHLC record consumed by candlestick series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub timestamp: DateTime<Utc>,
}

impl Candle {
    /// Builds a validated candle from raw floating values.
    ///
    /// Invariants:
    /// - all values are finite
    /// - `low <= high`
    /// - `open` and `close` are within `[low, high]`
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
    ) -> ChartResult<Self> {
        if !open.is_finite() || !high.is_finite() || !low.is_finite() || !close.is_finite() {
            return Err(ChartError::InvalidData(
                "ohlc values must be finite".to_owned(),
            ));
        }

        if low > high {
            return Err(ChartError::InvalidData(
                "ohlc low must be <= high".to_owned(),
            ));
        }

        if open < low || open > high || close < low || close > high {
            return Err(ChartError::InvalidData(
                "ohlc open/close must be within low/high range".to_owned(),
            ));
        }

        Ok(Self {
            open,
            high,
            low,
            close,
            timestamp,
        })
    }

    /// Converts decimal prices (as delivered by exchange feeds) into a validated candle.
    pub fn from_decimal(
        timestamp: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
    ) -> ChartResult<Self> {
        Self::new(
            timestamp,
            decimal_to_f64(open, "open")?,
            decimal_to_f64(high, "high")?,
            decimal_to_f64(low, "low")?,
            decimal_to_f64(close, "close")?,
        )
    }

    /// Returns `true` when close is greater than or equal to open.
    #[must_use]
    pub fn is_growing(self) -> bool {
        self.close >= self.open
    }
}

fn decimal_to_f64(value: Decimal, field_name: &str) -> ChartResult<f64> {
    value.to_f64().ok_or_else(|| {
        ChartError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use rust_decimal::Decimal;

    use super::Candle;

    #[test]
    fn open_outside_range_is_rejected() {
        let bar = Candle::new(DateTime::<Utc>::UNIX_EPOCH, 120.0, 110.0, 90.0, 100.0);
        assert!(bar.is_err());
    }

    #[test]
    fn flat_candle_counts_as_growing() {
        let bar = Candle::new(DateTime::<Utc>::UNIX_EPOCH, 10.0, 11.0, 9.0, 10.0).expect("valid");
        assert!(bar.is_growing());
    }

    #[test]
    fn decimal_input_is_converted() {
        let bar = Candle::from_decimal(
            DateTime::<Utc>::UNIX_EPOCH,
            Decimal::new(1005, 1),
            Decimal::new(1100, 1),
            Decimal::new(950, 1),
            Decimal::new(1000, 1),
        )
        .expect("valid decimal candle");
        assert_eq!(bar.open, 100.5);
        assert!(!bar.is_growing());
    }
}
