use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::core::primitives::decimal_to_f64;
use crate::error::ChartResult;

/// Property name whose per-point values override a bar's fill color.
pub const FILL_COLOR_PROPERTY: &str = "FillColor";

/// Role token used when a chart type does not name one.
pub const DEFAULT_SERIES_LABEL_ROLE: &str = "values-y";

/// One data series: ordered Y values, display labels keyed by role and
/// optional per-point property columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataSeries {
    values: Vec<f64>,
    labels: IndexMap<String, String>,
    properties: IndexMap<String, Vec<f64>>,
}

impl DataSeries {
    #[must_use]
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            labels: IndexMap::new(),
            properties: IndexMap::new(),
        }
    }

    pub fn from_decimals(values: &[Decimal]) -> ChartResult<Self> {
        let values = values
            .iter()
            .map(|value| decimal_to_f64(*value, "series value"))
            .collect::<ChartResult<Vec<_>>>()?;
        Ok(Self::new(values))
    }

    /// Sets the display label reported for `role`.
    #[must_use]
    pub fn with_label(mut self, role: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(role.into(), label.into());
        self
    }

    /// Maps a named property to per-point values. Missing points read as NaN.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.properties.insert(name.into(), values);
        self
    }

    #[must_use]
    pub fn point_count(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn y_value(&self, index: usize) -> f64 {
        self.values.get(index).copied().unwrap_or(f64::NAN)
    }

    /// Display label for the given role; empty when the series has none.
    #[must_use]
    pub fn label(&self, role: &str) -> &str {
        self.labels.get(role).map_or("", String::as_str)
    }

    #[must_use]
    pub fn has_property_mapping(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    #[must_use]
    pub fn value_by_property(&self, index: usize, name: &str) -> f64 {
        self.properties
            .get(name)
            .and_then(|column| column.get(index))
            .copied()
            .unwrap_or(f64::NAN)
    }
}

/// Source of category labels laid out along the X axis.
pub trait CategoryProvider {
    fn simple_categories(&self) -> Vec<String>;
}

impl CategoryProvider for [String] {
    fn simple_categories(&self) -> Vec<String> {
        self.to_vec()
    }
}

impl CategoryProvider for Vec<String> {
    fn simple_categories(&self) -> Vec<String> {
        self.clone()
    }
}

impl CategoryProvider for [&str] {
    fn simple_categories(&self) -> Vec<String> {
        self.iter().map(|label| (*label).to_owned()).collect()
    }
}

impl<const N: usize> CategoryProvider for [&str; N] {
    fn simple_categories(&self) -> Vec<String> {
        self.as_slice().simple_categories()
    }
}

/// Chart type metadata; only used to pick the series display-name role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartType {
    series_label_role: String,
}

impl ChartType {
    #[must_use]
    pub fn new(series_label_role: impl Into<String>) -> Self {
        Self {
            series_label_role: series_label_role.into(),
        }
    }

    #[must_use]
    pub fn series_label_role(&self) -> &str {
        &self.series_label_role
    }
}

impl Default for ChartType {
    fn default() -> Self {
        Self::new(DEFAULT_SERIES_LABEL_ROLE)
    }
}
