use ordered_float::OrderedFloat;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::core::DataSeries;
use crate::error::{ChartError, ChartResult};

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> ChartResult<f64> {
    value.to_f64().ok_or_else(|| {
        ChartError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

/// Largest Y value across all series, never below zero. NaN values are skipped.
#[must_use]
pub fn max_series_value(series: &[DataSeries]) -> f64 {
    series
        .iter()
        .flat_map(|series| series.values().iter().copied())
        .filter(|value| !value.is_nan())
        .map(OrderedFloat)
        .max()
        .map_or(0.0, |max| max.0.max(0.0))
}

/// Divisor that maps the largest value to a bar height of 100 units.
///
/// All-zero (or all-negative) data falls back to `1/100` so heights stay finite.
#[must_use]
pub fn height_normalizer(max_value: f64) -> f64 {
    if max_value.is_finite() && max_value > 0.0 {
        max_value / 100.0
    } else {
        1.0 / 100.0
    }
}

/// Normalized bar height; non-finite inputs collapse to zero.
#[must_use]
pub fn bar_height(value: f64, normalizer: f64) -> f32 {
    let height = value / normalizer;
    if height.is_finite() { height as f32 } else { 0.0 }
}
