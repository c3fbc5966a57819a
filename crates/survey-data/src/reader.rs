//! Record file discovery and loading.
//!
//! Accepts either a single `.json` / `.jsonl` file or a directory tree of
//! them, and converts every row into a [`ClassificationRecord`]. Rows are
//! taken as they come: confidences outside `[0, 1]` are kept and only
//! counted, so the aggregator sees exactly what the provider supplied.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use survey_core::error::{Result, SurveyError};
use survey_core::models::ClassificationRecord;
use survey_core::timestamps::parse_timestamp;
use tracing::{debug, warn};

// ── Public types ──────────────────────────────────────────────────────────────

/// Records read from disk plus bookkeeping about what was skipped.
#[derive(Debug, Clone, Default)]
pub struct LoadedRecords {
    /// Records in file order, files visited in sorted path order.
    pub records: Vec<ClassificationRecord>,
    /// Number of record files read.
    pub files_read: usize,
    /// JSONL lines that could not be parsed into a record.
    pub lines_skipped: usize,
    /// Records whose confidence lies outside `[0, 1]`.
    pub out_of_range: usize,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Record files at `path`: the path itself when it is a file, otherwise every
/// `.json` / `.jsonl` file beneath it, sorted by path.
pub fn find_record_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && is_record_file(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Load every record reachable from `path`.
pub fn load_records(path: &Path) -> Result<LoadedRecords> {
    if !path.exists() {
        return Err(SurveyError::DataPathNotFound(path.to_path_buf()));
    }

    let files = find_record_files(path);
    if files.is_empty() {
        return Err(SurveyError::NoDataFiles(path.to_path_buf()));
    }

    let mut loaded = LoadedRecords::default();
    for file in &files {
        if has_extension(file, "jsonl") {
            read_jsonl_file(file, &mut loaded)?;
        } else {
            read_json_file(file, &mut loaded)?;
        }
        loaded.files_read += 1;
    }

    if loaded.out_of_range > 0 {
        warn!(
            "{} records have a confidence outside [0, 1]; they are kept as-is",
            loaded.out_of_range
        );
    }
    debug!(
        "Loaded {} records from {} files ({} lines skipped)",
        loaded.records.len(),
        loaded.files_read,
        loaded.lines_skipped
    );

    Ok(loaded)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// On-disk shape of a record. Accepts both snake_case and the camelCase
/// names used by dashboard exports.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(alias = "subjectId", alias = "starId")]
    subject_id: String,
    #[serde(alias = "confidenceScore")]
    confidence: f64,
    #[serde(alias = "predictedLabel")]
    label: String,
    #[serde(default)]
    model: Option<String>,
    #[serde(default, alias = "classifiedAt", alias = "timestamp")]
    classified_at: Option<serde_json::Value>,
}

impl RawRecord {
    fn into_record(self) -> ClassificationRecord {
        ClassificationRecord {
            subject_id: self.subject_id,
            confidence: self.confidence,
            label: self.label,
            model: self.model.filter(|m| !m.is_empty()),
            classified_at: self.classified_at.as_ref().and_then(parse_timestamp),
        }
    }
}

fn push_record(raw: RawRecord, loaded: &mut LoadedRecords) {
    let record = raw.into_record();
    if !record.has_valid_confidence() {
        debug!(
            "Record {} has out-of-range confidence {}",
            record.subject_id, record.confidence
        );
        loaded.out_of_range += 1;
    }
    loaded.records.push(record);
}

/// A `.json` file holds one array of records and must parse as a whole.
fn read_json_file(path: &Path, loaded: &mut LoadedRecords) -> Result<()> {
    let content = std::fs::read_to_string(path).map_err(|source| SurveyError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let rows: Vec<RawRecord> =
        serde_json::from_str(&content).map_err(|source| SurveyError::JsonParse {
            path: path.to_path_buf(),
            source,
        })?;
    for raw in rows {
        push_record(raw, loaded);
    }
    Ok(())
}

/// A `.jsonl` file holds one record per line; bad lines are skipped.
fn read_jsonl_file(path: &Path, loaded: &mut LoadedRecords) -> Result<()> {
    let file = std::fs::File::open(path).map_err(|source| SurveyError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let reader = std::io::BufReader::new(file);
    for (line_no, line_result) in reader.lines().enumerate() {
        let line = line_result.map_err(|source| SurveyError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match serde_json::from_str::<RawRecord>(trimmed) {
            Ok(raw) => push_record(raw, loaded),
            Err(e) => {
                debug!(
                    "Skipping {}:{}: {}",
                    path.display(),
                    line_no + 1,
                    e
                );
                loaded.lines_skipped += 1;
            }
        }
    }

    Ok(())
}

fn is_record_file(path: &Path) -> bool {
    has_extension(path, "json") || has_extension(path, "jsonl")
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().map(|e| e == ext).unwrap_or(false)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    // ── find_record_files ─────────────────────────────────────────────────────

    #[test]
    fn test_find_record_files_recursive_and_sorted() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "b.jsonl", "");
        write(tmp.path(), "a.json", "[]");
        write(tmp.path(), "nested/c.jsonl", "");
        write(tmp.path(), "notes.txt", "ignore me");

        let files = find_record_files(tmp.path());
        let names: Vec<String> = files
            .iter()
            .map(|p| {
                p.strip_prefix(tmp.path())
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        assert_eq!(names, vec!["a.json", "b.jsonl", "nested/c.jsonl"]);
    }

    #[test]
    fn test_find_record_files_single_file() {
        let tmp = TempDir::new().unwrap();
        let path = write(tmp.path(), "results.jsonl", "");
        assert_eq!(find_record_files(&path), vec![path]);
    }

    // ── load_records ──────────────────────────────────────────────────────────

    #[test]
    fn test_load_jsonl_with_aliases_and_bad_lines() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            tmp.path(),
            "results.jsonl",
            concat!(
                r#"{"subject_id":"KIC-1234567","confidence":0.89,"label":"Exoplanet"}"#,
                "\n\n",
                r#"{"starId":"KIC-2345678","confidenceScore":0.76,"predictedLabel":"No Planet","model":"Random Forest","timestamp":"2024-01-15 10:32"}"#,
                "\n",
                "not json at all\n",
                r#"{"subjectId":"KIC-3456789","label":"Exoplanet"}"#,
                "\n",
            ),
        );

        let loaded = load_records(&path).unwrap();

        assert_eq!(loaded.files_read, 1);
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.lines_skipped, 2);
        assert_eq!(loaded.out_of_range, 0);

        let second = &loaded.records[1];
        assert_eq!(second.subject_id, "KIC-2345678");
        assert_eq!(second.label, "No Planet");
        assert_eq!(second.model.as_deref(), Some("Random Forest"));
        let ts = second.classified_at.unwrap();
        assert_eq!((ts.day(), ts.hour(), ts.minute()), (15, 10, 32));
    }

    #[test]
    fn test_load_json_array() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            tmp.path(),
            "results.json",
            r#"[
                {"subjectId":"KIC-1","confidence":0.5,"label":"Anomaly"},
                {"subjectId":"KIC-2","confidence":0.9,"label":"Exoplanet","classifiedAt":"2024-01-15T10:30:00Z"}
            ]"#,
        );

        let loaded = load_records(&path).unwrap();
        assert_eq!(loaded.records.len(), 2);
        assert!(loaded.records[0].classified_at.is_none());
        assert!(loaded.records[1].classified_at.is_some());
    }

    #[test]
    fn test_load_malformed_json_is_an_error() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "good.json", "[]");
        let bad = write(tmp.path(), "broken.json", "[{\"subjectId\":");

        // Loading the directory must say which of its files is broken.
        let err = load_records(tmp.path()).unwrap_err();
        assert!(matches!(&err, SurveyError::JsonParse { path, .. } if path == &bad));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_load_keeps_out_of_range_confidence() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            tmp.path(),
            "results.jsonl",
            concat!(
                r#"{"subjectId":"A","confidence":1.7,"label":"Exoplanet"}"#,
                "\n",
                r#"{"subjectId":"B","confidence":-0.2,"label":"Anomaly"}"#,
                "\n",
            ),
        );

        let loaded = load_records(&path).unwrap();
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.out_of_range, 2);
    }

    #[test]
    fn test_load_unparseable_timestamp_becomes_none() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            tmp.path(),
            "results.jsonl",
            r#"{"subjectId":"A","confidence":0.9,"label":"Exoplanet","timestamp":"last tuesday"}"#,
        );

        let loaded = load_records(&path).unwrap();
        assert_eq!(loaded.records.len(), 1);
        assert!(loaded.records[0].classified_at.is_none());
    }

    #[test]
    fn test_load_directory_concatenates_files_in_order() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "2024-02.jsonl",
            r#"{"subjectId":"B","confidence":0.7,"label":"No Planet"}"#,
        );
        write(
            tmp.path(),
            "2024-01.jsonl",
            r#"{"subjectId":"A","confidence":0.8,"label":"Exoplanet"}"#,
        );

        let loaded = load_records(tmp.path()).unwrap();
        assert_eq!(loaded.files_read, 2);
        let ids: Vec<&str> = loaded.records.iter().map(|r| r.subject_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[test]
    fn test_load_missing_path() {
        let tmp = TempDir::new().unwrap();
        let err = load_records(&tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, SurveyError::DataPathNotFound(_)));
    }

    #[test]
    fn test_load_directory_without_record_files() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "readme.md", "# nothing here");
        let err = load_records(tmp.path()).unwrap_err();
        assert!(matches!(err, SurveyError::NoDataFiles(_)));
    }
}
