use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower bound (inclusive) of the [`ConfidenceBand::High`] band.
pub const HIGH_CONFIDENCE: f64 = 0.8;
/// Lower bound (inclusive) of the [`ConfidenceBand::Medium`] band.
pub const MEDIUM_CONFIDENCE: f64 = 0.6;
/// Smallest threshold increment a sweep accepts; caps a sweep at 10,001 steps.
pub const MIN_SWEEP_STEP: f64 = 1e-4;

/// One classifier verdict for one observed subject.
///
/// The aggregator only ever reads these; `confidence` is expected to lie in
/// `[0, 1]` but nothing downstream enforces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    /// Opaque catalog identifier, e.g. `"KIC-1234567"`.
    pub subject_id: String,
    /// Classifier certainty.
    pub confidence: f64,
    /// Assigned category. Open vocabulary.
    pub label: String,
    /// Name of the classifier that produced the verdict, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// When the classification was made, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classified_at: Option<DateTime<Utc>>,
}

impl ClassificationRecord {
    /// Build a record with no model or timestamp attached.
    pub fn new(subject_id: impl Into<String>, confidence: f64, label: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            confidence,
            label: label.into(),
            model: None,
            classified_at: None,
        }
    }

    /// Attach the producing classifier's name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// `true` when `confidence` lies in the closed interval `[0, 1]`.
    pub fn has_valid_confidence(&self) -> bool {
        (0.0..=1.0).contains(&self.confidence)
    }

    pub fn band(&self) -> ConfidenceBand {
        ConfidenceBand::from_confidence(self.confidence)
    }
}

/// Number of records carrying one label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

impl LabelCount {
    pub fn new(label: impl Into<String>, count: usize) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// Coarse confidence grading used when presenting results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    /// `confidence >= 0.8`
    High,
    /// `0.6 <= confidence < 0.8`
    Medium,
    /// Everything else, NaN included.
    Low,
}

impl ConfidenceBand {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= HIGH_CONFIDENCE {
            ConfidenceBand::High
        } else if confidence >= MEDIUM_CONFIDENCE {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceBand::High => "high",
            ConfidenceBand::Medium => "medium",
            ConfidenceBand::Low => "low",
        }
    }
}

impl fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record counts per [`ConfidenceBand`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl BandCounts {
    pub fn add(&mut self, band: ConfidenceBand) {
        match band {
            ConfidenceBand::High => self.high += 1,
            ConfidenceBand::Medium => self.medium += 1,
            ConfidenceBand::Low => self.low += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries_are_inclusive() {
        assert_eq!(ConfidenceBand::from_confidence(0.8), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::from_confidence(0.79), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::from_confidence(0.6), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::from_confidence(0.59), ConfidenceBand::Low);
    }

    #[test]
    fn test_band_out_of_range_and_nan() {
        assert_eq!(ConfidenceBand::from_confidence(1.5), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::from_confidence(-0.2), ConfidenceBand::Low);
        assert_eq!(ConfidenceBand::from_confidence(f64::NAN), ConfidenceBand::Low);
    }

    #[test]
    fn test_band_display() {
        assert_eq!(ConfidenceBand::High.to_string(), "high");
        assert_eq!(ConfidenceBand::Medium.to_string(), "medium");
        assert_eq!(ConfidenceBand::Low.to_string(), "low");
    }

    #[test]
    fn test_band_counts_total() {
        let mut counts = BandCounts::default();
        counts.add(ConfidenceBand::High);
        counts.add(ConfidenceBand::High);
        counts.add(ConfidenceBand::Low);
        assert_eq!(counts.high, 2);
        assert_eq!(counts.medium, 0);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_record_valid_confidence() {
        assert!(ClassificationRecord::new("A", 0.0, "x").has_valid_confidence());
        assert!(ClassificationRecord::new("A", 1.0, "x").has_valid_confidence());
        assert!(!ClassificationRecord::new("A", 1.01, "x").has_valid_confidence());
        assert!(!ClassificationRecord::new("A", f64::NAN, "x").has_valid_confidence());
    }

    #[test]
    fn test_record_serializes_without_optional_fields() {
        let record = ClassificationRecord::new("KIC-1234567", 0.89, "Exoplanet");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["subject_id"], "KIC-1234567");
        assert_eq!(json["label"], "Exoplanet");
        assert!(json.get("model").is_none());
        assert!(json.get("classified_at").is_none());
    }

    #[test]
    fn test_record_with_model() {
        let record = ClassificationRecord::new("KIC-2345678", 0.76, "No Planet").with_model("CNN");
        assert_eq!(record.model.as_deref(), Some("CNN"));
        assert_eq!(record.band(), ConfidenceBand::Medium);
    }
}
