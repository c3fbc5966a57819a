use clap::Parser;
use std::path::PathBuf;

use crate::error::{Result, SurveyError};
use crate::models::MIN_SWEEP_STEP;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Threshold-driven summaries of exoplanet classification results
#[derive(Parser, Debug, Clone)]
#[command(
    name = "exo-survey",
    about = "Threshold-driven summaries of exoplanet classification results",
    version
)]
pub struct Settings {
    /// Record file (.json / .jsonl) or directory of record files
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Minimum confidence a record needs to be counted
    #[arg(long, default_value = "0.7", allow_negative_numbers = true)]
    pub threshold: f64,

    /// Label reported separately in every summary
    #[arg(long, default_value = "Exoplanet")]
    pub focus_label: String,

    /// Only consider records produced by this classifier
    #[arg(long)]
    pub model: Option<String>,

    /// Report one summary per threshold step instead of a single summary
    #[arg(long)]
    pub sweep: bool,

    /// Threshold increment used by --sweep
    #[arg(long, default_value = "0.05")]
    pub step: f64,

    /// Output format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments and validate them.
    ///
    /// Exits the process on `--help`, `--version` or a clap usage error.
    pub fn load() -> Result<Self> {
        Settings::parse().resolve()
    }

    /// Same as [`Settings::load`] but with an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let settings =
            Settings::try_parse_from(args).map_err(|e| SurveyError::Config(e.to_string()))?;
        settings.resolve()
    }

    /// Validate numeric options and apply the `--debug` flag.
    ///
    /// The threshold itself may lie outside `[0, 1]`; it only has to be a
    /// number the filter can compare against.
    pub fn resolve(mut self) -> Result<Self> {
        if !self.threshold.is_finite() {
            return Err(SurveyError::Config(format!(
                "threshold must be a finite number, got {}",
                self.threshold
            )));
        }
        if !(self.step.is_finite() && self.step >= MIN_SWEEP_STEP && self.step <= 1.0) {
            return Err(SurveyError::Config(format!(
                "step must be in [{}, 1], got {}",
                MIN_SWEEP_STEP, self.step
            )));
        }
        if self.focus_label.trim().is_empty() {
            return Err(SurveyError::Config("focus label must not be empty".into()));
        }

        // --debug overrides log level.
        if self.debug {
            self.log_level = "DEBUG".to_string();
        }

        Ok(self)
    }

    pub fn wants_json(&self) -> bool {
        self.format == "json"
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
