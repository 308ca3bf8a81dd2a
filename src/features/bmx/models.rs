use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use crate::shared::traits::Validatable;

/// Parsed `Key: Value` pairs from one status page, keyed by stat name.
pub type StatEntries = BTreeMap<String, String>;

/// Root segment every metric path starts with.
pub const METRIC_ROOT: &str = "HTTPD";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Workers,
    Connections,
    Percent,
    Default,
}

impl Category {
    /// Path segment inserted between the root and the stat name, if any.
    pub fn subtree(&self) -> Option<&'static str> {
        match self {
            Category::Workers => Some("Workers"),
            Category::Connections => Some("Connections"),
            Category::Percent | Category::Default => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub unit: &'static str,
    pub category: Category,
}

impl Classification {
    pub const fn new(unit: &'static str, category: Category) -> Self {
        Self { unit, category }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
}

impl MetricValue {
    /// Numeric view of the value; text values are parsed leniently.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Number(n) => Some(*n),
            MetricValue::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Number(n) => write!(f, "{:?}", n),
            MetricValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Number(value)
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        MetricValue::Text(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub path: String,
    pub unit: String,
    pub value: MetricValue,
}

impl Metric {
    pub fn new(path: impl Into<String>, unit: impl Into<String>, value: impl Into<MetricValue>) -> Self {
        Self {
            path: path.into(),
            unit: unit.into(),
            value: value.into(),
        }
    }
}

/// Console line format: `path[unit] : value`.
impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}] : {}", self.path, self.unit, self.value)
    }
}

impl Validatable for Metric {
    fn validate(&self) -> Result<(), String> {
        if !self.path.starts_with(METRIC_ROOT) {
            return Err(format!("Metric path {} is outside the {} tree", self.path, METRIC_ROOT));
        }
        if self.unit.is_empty() {
            return Err(format!("Metric {} has no unit", self.path));
        }
        if let MetricValue::Number(n) = self.value {
            if !n.is_finite() {
                return Err(format!("Metric {} has non-finite value {}", self.path, n));
            }
        }
        Ok(())
    }
}
