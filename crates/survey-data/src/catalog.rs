//! Built-in sample catalog used when no record file is supplied.

use chrono::{TimeZone, Utc};
use survey_core::models::ClassificationRecord;

/// `(subject_id, confidence, label, model, minute past 10:00 on 2024-01-15)`
const SAMPLE_ROWS: &[(&str, f64, &str, Option<&str>, Option<u32>)] = &[
    ("KIC-1234567", 0.89, "Exoplanet", Some("CNN"), Some(30)),
    ("KIC-2345678", 0.76, "No Planet", Some("Random Forest"), Some(32)),
    ("KIC-3456789", 0.92, "Exoplanet", Some("CNN"), Some(35)),
    ("KIC-4567890", 0.68, "Anomaly", Some("CNN"), Some(38)),
    ("KIC-5678901", 0.84, "No Planet", Some("Random Forest"), Some(40)),
    ("KIC-6789012", 0.91, "Exoplanet", None, None),
    ("KIC-7890123", 0.73, "Anomaly", None, None),
];

/// Seven Kepler-style classification results.
pub fn sample_records() -> Vec<ClassificationRecord> {
    SAMPLE_ROWS
        .iter()
        .map(|&(id, confidence, label, model, minute)| ClassificationRecord {
            subject_id: id.to_string(),
            confidence,
            label: label.to_string(),
            model: model.map(str::to_string),
            classified_at: minute
                .and_then(|m| Utc.with_ymd_and_hms(2024, 1, 15, 10, m, 0).single()),
        })
        .collect()
}
