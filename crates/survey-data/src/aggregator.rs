//! Threshold filtering and label histograms over classification records.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use survey_core::error::{Result, SurveyError};
use survey_core::models::{BandCounts, ClassificationRecord, LabelCount, MIN_SWEEP_STEP};
use tracing::debug;

/// Sweep thresholds are rounded to twelve decimals, which removes the
/// binary noise in `14 * 0.05` without moving any grid point.
const SWEEP_PRECISION: f64 = 1e12;

// ── RecordSelection ───────────────────────────────────────────────────────────

/// Narrows the record set before any threshold is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSelection {
    /// Keep only records produced by this classifier (case-insensitive).
    /// `None` keeps everything.
    pub model: Option<String>,
}

impl RecordSelection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_model(model: impl Into<String>) -> Self {
        Self {
            model: Some(model.into()),
        }
    }

    pub fn matches(&self, record: &ClassificationRecord) -> bool {
        match (&self.model, &record.model) {
            (None, _) => true,
            (Some(wanted), Some(actual)) => wanted.eq_ignore_ascii_case(actual),
            (Some(_), None) => false,
        }
    }

    /// Borrow the matching records, preserving input order.
    pub fn apply<'a>(&self, records: &'a [ClassificationRecord]) -> Vec<&'a ClassificationRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

// ── ThresholdSummary ──────────────────────────────────────────────────────────

/// Options shared by [`ClassificationAggregator::summarize`] and
/// [`ClassificationAggregator::sweep`].
#[derive(Debug, Clone, Default)]
pub struct SummaryOptions {
    /// Label whose count is reported on its own, even when zero.
    pub focus_label: Option<String>,
    pub selection: RecordSelection,
}

/// Everything derived from one record set at one threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSummary {
    pub threshold: f64,
    /// Records considered after the selection, before the threshold.
    pub total_records: usize,
    /// Records with `confidence >= threshold`.
    pub above_threshold: usize,
    /// Mean confidence of the records above threshold; `None` when there are none.
    pub mean_confidence: Option<f64>,
    /// Per-label counts in first-occurrence order.
    pub label_counts: Vec<LabelCount>,
    pub band_counts: BandCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<LabelCount>,
}

// ── ClassificationAggregator ──────────────────────────────────────────────────

/// Stateless helper that filters records by confidence and counts labels.
pub struct ClassificationAggregator;

impl ClassificationAggregator {
    /// Records with `confidence >= threshold`, in input order.
    ///
    /// The threshold is not validated: values outside `[0, 1]` simply keep
    /// everything or nothing. NaN never compares as `>=`, so NaN confidences
    /// are always dropped and a NaN threshold drops every record.
    pub fn filter_by_threshold<'a, I>(records: I, threshold: f64) -> Vec<&'a ClassificationRecord>
    where
        I: IntoIterator<Item = &'a ClassificationRecord>,
    {
        records
            .into_iter()
            .filter(|r| r.confidence >= threshold)
            .collect()
    }

    /// One entry per distinct label, ordered by first appearance.
    pub fn count_by_label<'a, I>(records: I) -> Vec<LabelCount>
    where
        I: IntoIterator<Item = &'a ClassificationRecord>,
    {
        let mut counts: Vec<LabelCount> = Vec::new();
        let mut index: HashMap<&'a str, usize> = HashMap::new();

        for record in records {
            match index.get(record.label.as_str()) {
                Some(&slot) => counts[slot].count += 1,
                None => {
                    index.insert(record.label.as_str(), counts.len());
                    counts.push(LabelCount::new(record.label.clone(), 1));
                }
            }
        }

        counts
    }

    /// Arithmetic mean of `confidence`, `None` for an empty input.
    pub fn mean_confidence<'a, I>(records: I) -> Option<f64>
    where
        I: IntoIterator<Item = &'a ClassificationRecord>,
    {
        let (sum, n) = records
            .into_iter()
            .fold((0.0_f64, 0_usize), |(sum, n), r| (sum + r.confidence, n + 1));
        if n == 0 {
            None
        } else {
            Some(sum / n as f64)
        }
    }

    /// Number of records whose label equals `label` exactly.
    pub fn count_for_label<'a, I>(records: I, label: &str) -> usize
    where
        I: IntoIterator<Item = &'a ClassificationRecord>,
    {
        records.into_iter().filter(|r| r.label == label).count()
    }

    pub fn count_by_band<'a, I>(records: I) -> BandCounts
    where
        I: IntoIterator<Item = &'a ClassificationRecord>,
    {
        let mut bands = BandCounts::default();
        for record in records {
            bands.add(record.band());
        }
        bands
    }

    /// Apply the selection, then the threshold, and derive every statistic.
    pub fn summarize(
        records: &[ClassificationRecord],
        threshold: f64,
        options: &SummaryOptions,
    ) -> ThresholdSummary {
        let selected = options.selection.apply(records);
        Self::summarize_selected(&selected, threshold, options.focus_label.as_deref())
    }

    /// Summaries at `0, step, 2*step, ...` up to and including `1.0`.
    ///
    /// `step` must lie in `[MIN_SWEEP_STEP, 1]`.
    pub fn sweep(
        records: &[ClassificationRecord],
        step: f64,
        options: &SummaryOptions,
    ) -> Result<Vec<ThresholdSummary>> {
        let thresholds = sweep_thresholds(step)?;
        let selected = options.selection.apply(records);
        let focus = options.focus_label.as_deref();

        debug!(
            "Sweeping {} thresholds over {} selected records",
            thresholds.len(),
            selected.len()
        );

        Ok(thresholds
            .into_iter()
            .map(|t| Self::summarize_selected(&selected, t, focus))
            .collect())
    }

    // ── Private ───────────────────────────────────────────────────────────────

    fn summarize_selected(
        selected: &[&ClassificationRecord],
        threshold: f64,
        focus_label: Option<&str>,
    ) -> ThresholdSummary {
        let filtered = Self::filter_by_threshold(selected.iter().copied(), threshold);
        let focus = focus_label.map(|label| {
            LabelCount::new(
                label,
                Self::count_for_label(filtered.iter().copied(), label),
            )
        });

        let summary = ThresholdSummary {
            threshold,
            total_records: selected.len(),
            above_threshold: filtered.len(),
            mean_confidence: Self::mean_confidence(filtered.iter().copied()),
            label_counts: Self::count_by_label(filtered.iter().copied()),
            band_counts: Self::count_by_band(filtered.iter().copied()),
            focus,
        };

        debug!(
            "threshold {:.4}: {}/{} records, {} labels",
            threshold,
            summary.above_threshold,
            summary.total_records,
            summary.label_counts.len()
        );

        summary
    }
}

/// Evenly spaced thresholds from 0 through 1 inclusive.
fn sweep_thresholds(step: f64) -> Result<Vec<f64>> {
    if !(step.is_finite() && step >= MIN_SWEEP_STEP && step <= 1.0) {
        return Err(SurveyError::InvalidThreshold(format!(
            "step must be in [{}, 1], got {}",
            MIN_SWEEP_STEP, step
        )));
    }

    // Small slack so that 1.0 / 0.05 lands on 20 rather than 19.
    let steps = (1.0 / step + 1e-9).floor() as usize;
    let mut thresholds: Vec<f64> = (0..=steps)
        .map(|i| ((i as f64 * step * SWEEP_PRECISION).round() / SWEEP_PRECISION).min(1.0))
        .collect();

    if thresholds.last().is_some_and(|&t| t < 1.0) {
        thresholds.push(1.0);
    }

    Ok(thresholds)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
