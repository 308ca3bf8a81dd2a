use crate::features::bmx::classifier::classify;
use crate::features::bmx::models::{Category, Metric, MetricValue, METRIC_ROOT};
use crate::shared::error::ProcessingError;

/// `HTTPD/<subtree>/<key>`, or `HTTPD/<key>` for categories without a subtree.
pub fn metric_path(key: &str, category: Category) -> String {
    match category.subtree() {
        Some(subtree) => format!("{}/{}/{}", METRIC_ROOT, subtree, key),
        None => format!("{}/{}", METRIC_ROOT, key),
    }
}

/// Build the metric path and apply the category's value conversion.
///
/// Percent stats arrive as a ratio and are scaled by 100. Every other
/// category passes the raw value through.
pub fn transform(
    key: &str,
    value: &str,
    category: Category,
) -> Result<(String, MetricValue), ProcessingError> {
    let path = metric_path(key, category);
    let value = match category {
        Category::Percent => {
            let ratio = value.trim().parse::<f64>().map_err(|_| ProcessingError::InvalidNumber {
                key: key.to_string(),
                value: value.to_string(),
            })?;
            MetricValue::Number(ratio * 100.0)
        }
        Category::Workers | Category::Connections | Category::Default => MetricValue::Text(value.to_string()),
    };
    Ok((path, value))
}

/// Classify and transform one stat into a reportable metric.
pub fn build_metric(key: &str, value: &str) -> Result<Metric, ProcessingError> {
    let classification = classify(key);
    let (path, value) = transform(key, value, classification.category)?;
    Ok(Metric {
        path,
        unit: classification.unit.to_string(),
        value,
    })
}
