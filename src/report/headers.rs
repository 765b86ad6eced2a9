//! Column display hints handed to the host alongside each table.
//!
//! These mirror the keys a MultiQC-style table renderer understands. Only
//! fields that are set get serialized.

use serde::{Deserialize, Serialize};

/// Comparison used in a conditional formatting rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Comparison {
    #[must_use]
    pub fn holds(self, value: f64, threshold: f64) -> bool {
        match self {
            Self::Gt => value > threshold,
            Self::Gte => value >= threshold,
            Self::Lt => value < threshold,
            Self::Lte => value <= threshold,
        }
    }
}

/// A named colour band: a value belongs to it when every rule holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalFormat {
    pub label: String,
    pub colour: String,
    pub rules: Vec<(Comparison, f64)>,
}

impl ConditionalFormat {
    pub fn new(
        label: impl Into<String>,
        colour: impl Into<String>,
        rules: &[(Comparison, f64)],
    ) -> Self {
        Self {
            label: label.into(),
            colour: colour.into(),
            rules: rules.to_vec(),
        }
    }

    #[must_use]
    pub fn matches(&self, value: f64) -> bool {
        self.rules
            .iter()
            .all(|(cmp, threshold)| cmp.holds(value, *threshold))
    }
}

/// Display configuration for one table column
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnHeader {
    /// Metric name the column is keyed on
    pub key: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditional_formats: Vec<ConditionalFormat>,
}

impl ColumnHeader {
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        if min.is_some() {
            self.min = min;
        }
        if max.is_some() {
            self.max = max;
        }
        self
    }

    #[must_use]
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    #[must_use]
    pub fn scale(mut self, scale: impl Into<String>) -> Self {
        self.scale = Some(scale.into());
        self
    }

    #[must_use]
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    #[must_use]
    pub fn placement(mut self, placement: u32) -> Self {
        self.placement = Some(placement);
        self
    }

    #[must_use]
    pub fn conditional(mut self, format: ConditionalFormat) -> Self {
        self.conditional_formats.push(format);
        self
    }

    /// Colour band label for `value`, if any band matches
    #[must_use]
    pub fn band_for(&self, value: f64) -> Option<&str> {
        self.conditional_formats
            .iter()
            .find(|f| f.matches(value))
            .map(|f| f.label.as_str())
    }
}

/// Uppercase the first character and lowercase the rest
///
/// # Examples
///
/// ```
/// use seglh_qc::report::headers::capitalize;
///
/// assert_eq!(capitalize("MEDIAN INSERT SIZE"), "Median insert size");
/// assert_eq!(capitalize("coeff var"), "Coeff var");
/// ```
#[must_use]
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conditional_bands() {
        let header = ColumnHeader::new("recall", "Recall")
            .conditional(ConditionalFormat::new(
                "verygreen",
                "#007000",
                &[(Comparison::Gte, 0.99)],
            ))
            .conditional(ConditionalFormat::new(
                "green",
                "#238823",
                &[(Comparison::Lt, 0.99), (Comparison::Gt, 0.98)],
            ))
            .conditional(ConditionalFormat::new(
                "red",
                "#D2222D",
                &[(Comparison::Lt, 0.90)],
            ));

        assert_eq!(header.band_for(0.995), Some("verygreen"));
        assert_eq!(header.band_for(0.985), Some("green"));
        assert_eq!(header.band_for(0.95), None);
        assert_eq!(header.band_for(0.5), Some("red"));
    }

    #[test]
    fn test_serialization_skips_unset() {
        let header = ColumnHeader::new("tp", "True Positives").suffix(" variants");
        let json = serde_json::to_value(&header).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"key": "tp", "title": "True Positives", "suffix": " variants"})
        );
    }

    #[test]
    fn test_range_keeps_existing_bounds() {
        let header = ColumnHeader::new("x", "X")
            .range(Some(0.0), Some(100.0))
            .range(None, Some(50.0));
        assert_eq!(header.min, Some(0.0));
        assert_eq!(header.max, Some(50.0));
    }
}
