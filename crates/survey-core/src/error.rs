use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the survey crates.
#[derive(Error, Debug)]
pub enum SurveyError {
    /// A record file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A `.json` record file could not be parsed.
    #[error("Failed to parse JSON in {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The requested input path does not exist.
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    /// No `.json` / `.jsonl` record files were found under the given directory.
    #[error("No record files found in {0}")]
    NoDataFiles(PathBuf),

    /// A threshold or sweep step is outside its accepted range.
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience alias used throughout the survey crates.
pub type Result<T> = std::result::Result<T, SurveyError>;
