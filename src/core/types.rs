use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

/// Metric name -> value for a single sample
pub type MetricMap = BTreeMap<String, MetricValue>;

/// Sample identifier -> metrics
pub type SampleMetrics = BTreeMap<String, MetricMap>;

fn float_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[-+]?(?:\d+\.\d+(?:[eE][-+]?\d+)?|\d+[eE][-+]?\d+)$")
            .expect("float pattern is valid")
    })
}

fn integer_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[-+]?\d+$").expect("integer pattern is valid"))
}

/// A metric value as read from a pipeline output file.
///
/// Variant order matters for untagged deserialization: JSON integers must
/// land in `Integer` before `Float` gets a chance to accept them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl MetricValue {
    /// Infer a value from raw text: float first, then integer, else text.
    ///
    /// # Examples
    ///
    /// ```
    /// use seglh_qc::core::types::MetricValue;
    ///
    /// assert_eq!(MetricValue::infer("0.5"), MetricValue::Float(0.5));
    /// assert_eq!(MetricValue::infer("42"), MetricValue::Integer(42));
    /// assert_eq!(MetricValue::infer("NA"), MetricValue::Text("NA".to_string()));
    /// ```
    #[must_use]
    pub fn infer(raw: &str) -> Self {
        if float_pattern().is_match(raw) {
            if let Ok(v) = raw.parse::<f64>() {
                if v.is_finite() {
                    return Self::Float(v);
                }
            }
        }
        if integer_pattern().is_match(raw) {
            if let Ok(v) = raw.parse::<i64>() {
                return Self::Integer(v);
            }
        }
        Self::Text(raw.to_string())
    }

    /// Numeric view of the value, if it has one
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            #[allow(clippy::cast_precision_loss)]
            Self::Integer(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Text(_) => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            // Debug keeps the decimal point ("1.0"), so the text infers back to a float
            Self::Float(v) => write!(f, "{v:?}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for MetricValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for MetricValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<&str> for MetricValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

/// A single (sample, metric, value) observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub sample_id: String,
    pub metric_name: String,
    pub value: MetricValue,
}

impl MetricRecord {
    pub fn new(
        sample_id: impl Into<String>,
        metric_name: impl Into<String>,
        value: impl Into<MetricValue>,
    ) -> Self {
        Self {
            sample_id: sample_id.into(),
            metric_name: metric_name.into(),
            value: value.into(),
        }
    }
}

/// Flatten a sample map into records, ordered by sample then metric
#[must_use]
pub fn to_records(samples: &SampleMetrics) -> Vec<MetricRecord> {
    samples
        .iter()
        .flat_map(|(sample, metrics)| {
            metrics
                .iter()
                .map(move |(metric, value)| MetricRecord::new(sample, metric, value.clone()))
        })
        .collect()
}

/// Display group -> metric names, in first-seen order and without duplicates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricGroups(BTreeMap<String, Vec<String>>);

impl MetricGroups {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `metric` to `group`. Returns false if it was already there.
    pub fn assign(&mut self, group: impl Into<String>, metric: impl Into<String>) -> bool {
        let metric = metric.into();
        let metrics = self.0.entry(group.into()).or_default();
        if metrics.contains(&metric) {
            return false;
        }
        metrics.push(metric);
        true
    }

    /// Merge another set of groups into this one
    pub fn extend(&mut self, other: &MetricGroups) {
        for (group, metrics) in other.iter() {
            for metric in metrics {
                self.assign(group.clone(), metric.clone());
            }
        }
    }

    /// Group names in sorted order with their metrics
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }

    #[must_use]
    pub fn metrics(&self, group: &str) -> Option<&[String]> {
        self.0.get(group).map(Vec::as_slice)
    }

    /// First group containing `metric`
    #[must_use]
    pub fn group_of(&self, metric: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(_, metrics)| metrics.iter().any(|m| m == metric))
            .map(|(group, _)| group.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Declared acceptable range for a metric. `None` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecLimit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<f64>,
}

impl SpecLimit {
    #[must_use]
    pub fn new(lower: Option<f64>, upper: Option<f64>) -> Self {
        Self { lower, upper }
    }

    /// Parse one bound; `NA` means no bound.
    ///
    /// # Errors
    ///
    /// Returns `InvalidBound` for anything that is neither `NA` nor a finite number.
    pub fn parse_bound(raw: &str) -> Result<Option<f64>, InvalidBound> {
        let raw = raw.trim();
        if raw == "NA" {
            return Ok(None);
        }
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| InvalidBound(raw.to_string()))
    }
}

/// A spec limit that is neither `NA` nor a finite number
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid limit: {0}")]
pub struct InvalidBound(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_order() {
        assert_eq!(MetricValue::infer("3.25"), MetricValue::Float(3.25));
        assert_eq!(MetricValue::infer("-0.5"), MetricValue::Float(-0.5));
        assert_eq!(MetricValue::infer("1.2e-05"), MetricValue::Float(1.2e-05));
        assert_eq!(MetricValue::infer("1e20"), MetricValue::Float(1e20));
        assert_eq!(MetricValue::infer("17"), MetricValue::Integer(17));
        assert_eq!(MetricValue::infer("-3"), MetricValue::Integer(-3));
        assert_eq!(MetricValue::infer(".5"), MetricValue::Text(".5".to_string()));
        assert_eq!(MetricValue::infer("NaN"), MetricValue::Text("NaN".to_string()));
        assert_eq!(MetricValue::infer("1e400"), MetricValue::Text("1e400".to_string()));
        assert_eq!(MetricValue::infer("-2.5e999"), MetricValue::Text("-2.5e999".to_string()));
        assert_eq!(MetricValue::infer(""), MetricValue::Text(String::new()));
    }

    #[test]
    fn test_display_reinfers_same_variant() {
        for value in [
            MetricValue::Float(1.0),
            MetricValue::Float(0.9912),
            MetricValue::Float(1.5e-7),
            MetricValue::Float(2e21),
            MetricValue::Integer(250),
            MetricValue::Text("hap.py".to_string()),
        ] {
            assert_eq!(MetricValue::infer(&value.to_string()), value);
        }
    }

    #[test]
    fn test_json_untagged_variants() {
        let json = r#"{"a": 5, "b": 1.0, "c": "x"}"#;
        let parsed: MetricMap = serde_json::from_str(json).unwrap();
        assert_eq!(parsed["a"], MetricValue::Integer(5));
        assert_eq!(parsed["b"], MetricValue::Float(1.0));
        assert_eq!(parsed["c"], MetricValue::Text("x".to_string()));
    }

    #[test]
    fn test_metric_groups_dedup_and_order() {
        let mut groups = MetricGroups::new();
        assert!(groups.assign("DNA Library QC Metrics", "B"));
        assert!(groups.assign("DNA Library QC Metrics", "A"));
        assert!(!groups.assign("DNA Library QC Metrics", "B"));
        assert!(groups.assign("Contamination", "C"));

        let names: Vec<&String> = groups.iter().map(|(g, _)| g).collect();
        assert_eq!(names, vec!["Contamination", "DNA Library QC Metrics"]);
        assert_eq!(
            groups.metrics("DNA Library QC Metrics").unwrap(),
            &["B".to_string(), "A".to_string()]
        );
        assert_eq!(groups.group_of("C"), Some("Contamination"));
    }

    #[test]
    fn test_spec_limit_bounds() {
        assert_eq!(SpecLimit::parse_bound("NA").unwrap(), None);
        assert_eq!(SpecLimit::parse_bound("0.5").unwrap(), Some(0.5));
        assert_eq!(SpecLimit::parse_bound("99.5").unwrap(), Some(99.5));
        assert!(SpecLimit::parse_bound("high").is_err());
        for raw in ["NaN", "inf", "-infinity", "1e400"] {
            assert_eq!(
                SpecLimit::parse_bound(raw),
                Err(InvalidBound(raw.to_string())),
                "{raw}"
            );
        }
    }

    #[test]
    fn test_to_records() {
        let mut samples = SampleMetrics::new();
        samples
            .entry("s1".to_string())
            .or_default()
            .insert("depth".to_string(), MetricValue::Integer(30));
        let records = to_records(&samples);
        assert_eq!(records, vec![MetricRecord::new("s1", "depth", 30_i64)]);
    }
}
