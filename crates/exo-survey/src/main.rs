mod bootstrap;
mod report;

use anyhow::Result;
use survey_core::settings::Settings;
use survey_data::aggregator::{ClassificationAggregator, RecordSelection, SummaryOptions};
use survey_data::catalog::sample_records;
use survey_data::reader::load_records;

fn main() -> Result<()> {
    let settings = Settings::load()?;

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("exo-survey v{} starting", env!("CARGO_PKG_VERSION"));

    let input = settings.input.clone().or_else(bootstrap::discover_input_path);
    let (records, source) = match input {
        Some(path) => {
            tracing::info!("Loading records from {}", path.display());
            let loaded = load_records(&path)?;
            if loaded.lines_skipped > 0 {
                tracing::warn!("Skipped {} unreadable lines", loaded.lines_skipped);
            }
            (loaded.records, path.display().to_string())
        }
        None => {
            tracing::info!("No input given, using the built-in sample catalog");
            (sample_records(), "sample catalog".to_string())
        }
    };

    let options = SummaryOptions {
        focus_label: Some(settings.focus_label.clone()),
        selection: RecordSelection {
            model: settings.model.clone(),
        },
    };

    let output = if settings.sweep {
        let summaries = ClassificationAggregator::sweep(&records, settings.step, &options)?;
        if settings.wants_json() {
            report::sweep_json(&summaries)?
        } else {
            report::render_sweep(&summaries, &source)
        }
    } else {
        let summary = ClassificationAggregator::summarize(&records, settings.threshold, &options);
        if summary.total_records == 0 {
            tracing::warn!("No records matched the current selection");
        }
        if settings.wants_json() {
            report::summary_json(&summary)?
        } else {
            report::render_summary(&summary, &source)
        }
    };

    println!("{}", output.trim_end());
    Ok(())
}
