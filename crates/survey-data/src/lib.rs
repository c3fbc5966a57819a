//! Data layer for exo-survey.
//!
//! Loads classification records from JSON / JSONL files (or the built-in
//! sample catalog) and aggregates them by confidence threshold.

pub mod aggregator;
pub mod catalog;
pub mod reader;

pub use survey_core as core;
