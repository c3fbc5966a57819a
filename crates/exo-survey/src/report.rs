//! Plain-text and JSON rendering of threshold summaries.

use std::fmt::Write;

use survey_core::formatting::{format_count, format_mean_confidence, format_percent, percentage};
use survey_data::aggregator::ThresholdSummary;

/// Render a single summary as an aligned text report.
///
/// `source` names where the records came from and is echoed in the header.
pub fn render_summary(summary: &ThresholdSummary, source: &str) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "{:<18}{}", "Source:", source);
    let _ = writeln!(out, "{:<18}{}", "Threshold:", format_percent(summary.threshold, 0));
    let _ = writeln!(out, "{:<18}{}", "Total records:", format_count(summary.total_records));
    let _ = writeln!(out, "{:<18}{}", "Above threshold:", format_count(summary.above_threshold));
    let _ = writeln!(
        out,
        "{:<18}{}",
        "Avg confidence:",
        format_mean_confidence(summary.mean_confidence)
    );
    if let Some(focus) = &summary.focus {
        let _ = writeln!(out, "{:<18}{}", format!("{}:", focus.label), format_count(focus.count));
    }
    out.push('\n');

    if summary.label_counts.is_empty() {
        out.push_str("No records at or above the threshold.\n");
        return out;
    }

    let width = summary
        .label_counts
        .iter()
        .map(|c| c.label.chars().count())
        .max()
        .unwrap_or(0)
        .max("Label".len());

    let _ = writeln!(out, "{:<width$}  {:>7}  {:>6}", "Label", "Count", "Share");
    for entry in &summary.label_counts {
        let share = percentage(entry.count, summary.above_threshold, 1);
        let _ = writeln!(
            out,
            "{:<width$}  {:>7}  {:>5.1}%",
            entry.label,
            format_count(entry.count),
            share
        );
    }

    let bands = &summary.band_counts;
    let _ = writeln!(
        out,
        "\nConfidence bands: high {}, medium {}, low {}",
        bands.high, bands.medium, bands.low
    );

    out
}

/// Render a sweep as one row per threshold.
pub fn render_sweep(summaries: &[ThresholdSummary], source: &str) -> String {
    let mut out = String::new();
    let focus_header = summaries
        .first()
        .and_then(|s| s.focus.as_ref())
        .map(|f| f.label.clone());

    let _ = writeln!(out, "Source: {}\n", source);
    let _ = write!(out, "{:>9}  {:>7}  {:>8}", "Threshold", "Above", "Avg conf");
    if let Some(label) = &focus_header {
        let _ = write!(out, "  {:>10}", label);
    }
    out.push('\n');

    for summary in summaries {
        let _ = write!(
            out,
            "{:>9}  {:>7}  {:>8}",
            format_percent(summary.threshold, 0),
            format_count(summary.above_threshold),
            format_mean_confidence(summary.mean_confidence)
        );
        if let Some(focus) = &summary.focus {
            let _ = write!(out, "  {:>10}", format_count(focus.count));
        }
        out.push('\n');
    }

    out
}

pub fn summary_json(summary: &ThresholdSummary) -> serde_json::Result<String> {
    serde_json::to_string_pretty(summary)
}

pub fn sweep_json(summaries: &[ThresholdSummary]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(summaries)
}
