//! Metric data structures.

use serde::{Deserialize, Serialize};

use super::text::LocalizedText;

/// Data-driven metric definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MetricData {
    /// Unique identifier.
    pub id: String,

    /// Display name.
    pub name: LocalizedText,

    /// Description.
    #[serde(default)]
    pub description: Option<LocalizedText>,

    /// Instrument kind.
    pub kind: MetricKind,

    /// Unit of measure.
    #[serde(default = "default_unit")]
    pub unit: String,

    /// Aggregation hint for exporters.
    #[serde(default)]
    pub aggregation: Option<String>,

    /// Attribute keys attached to samples.
    #[serde(default)]
    pub attributes: Vec<String>,

    /// Where values come from.
    #[serde(default)]
    pub source: MetricSource,
}

/// Instrument kind of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricKind {
    /// Monotonic sum.
    Counter,
    /// Last value.
    Gauge,
    /// Distribution.
    Histogram,
    /// Non-monotonic sum.
    UpDownCounter,
}

/// Origin of a metric's values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase", deny_unknown_fields)]
pub enum MetricSource {
    /// Recorded by the runtime.
    #[default]
    Runtime,
    /// Derived from content state.
    Content,
    /// Computed by a script.
    Script {
        /// Script id, checked against the script allowlist.
        script_id: String,
    },
}

fn default_unit() -> String {
    "1".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metric_defaults() {
        let metric: MetricData = serde_json::from_value(json!({
            "id": "pack.clicks",
            "name": "Clicks",
            "kind": "counter"
        }))
        .unwrap();
        assert_eq!(metric.source, MetricSource::Runtime);
        assert_eq!(metric.unit, "1");
    }
}
