//! Shared types for the exo-survey workspace.
//!
//! Holds the classification data model, the error type, command-line
//! settings and small formatting and timestamp helpers used by both the data
//! layer and the binary.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod timestamps;

pub use error::{Result, SurveyError};
