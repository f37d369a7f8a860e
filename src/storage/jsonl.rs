//! JSONL (JSON Lines) storage for benchmark records.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::BenchError;
use crate::core::schema::{BenchRecord, SCHEMA_VERSION};

/// JSONL writer/reader for benchmark records.
///
/// Each record is stored as a single JSON line, so runs can be appended
/// without rewriting the file.
#[derive(Debug, Clone)]
pub struct JsonlWriter {
    path: PathBuf,
}

impl JsonlWriter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        JsonlWriter {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a single record, creating the file and its parent directory.
    ///
    /// # Errors
    /// Returns an error if the record's schema_version doesn't match
    /// SCHEMA_VERSION or if the file cannot be written.
    pub fn append(&self, record: &BenchRecord) -> Result<(), BenchError> {
        if record.schema_version != SCHEMA_VERSION {
            return Err(BenchError::Message(format!(
                "schema version mismatch: record has v{}, expected v{}",
                record.schema_version, SCHEMA_VERSION
            )));
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| BenchError::Message(format!("failed to create directory: {e}")))?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| BenchError::Message(format!("failed to open file: {e}")))?;

        let json = serde_json::to_string(record)
            .map_err(|e| BenchError::Message(format!("failed to serialize record: {e}")))?;

        writeln!(file, "{}", json)
            .map_err(|e| BenchError::Message(format!("failed to write record: {e}")))?;

        Ok(())
    }

    /// Read all records, skipping blank lines.
    pub fn read_all(&self) -> Result<Vec<BenchRecord>, BenchError> {
        let file = File::open(&self.path).map_err(|e| {
            BenchError::Message(format!("failed to open {}: {e}", self.path.display()))
        })?;

        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result.map_err(|e| {
                BenchError::Message(format!("failed to read line {}: {e}", line_num + 1))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let record: BenchRecord = serde_json::from_str(&line).map_err(|e| {
                BenchError::Message(format!("failed to parse line {}: {e}", line_num + 1))
            })?;
            records.push(record);
        }

        Ok(records)
    }
}

/// Write a record (or a list of them) as pretty JSON, creating parent
/// directories.
pub fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), BenchError> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir).map_err(|e| BenchError::Message(e.to_string()))?;
        }
    }
    let json = serde_json::to_vec_pretty(value).map_err(|e| BenchError::Message(e.to_string()))?;
    std::fs::write(path, json).map_err(|e| BenchError::Message(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::{BenchmarkConfig, ProfileKind, Stage};
    use crate::core::env::EnvironmentInfo;
    use crate::curve::CurveId;
    use crate::engine::Measurement;

    fn make_test_record(circuit: &str) -> BenchRecord {
        let config = BenchmarkConfig {
            circuit: circuit.to_string(),
            size: 4,
            stage: Stage::Prove,
            curve: CurveId::Bn254,
            profile: ProfileKind::None,
            count: 2,
        };
        let measurement = Measurement {
            backend: "test".into(),
            stage: Stage::Prove,
            samples: vec![Duration::from_millis(3), Duration::from_millis(5)],
            total: Duration::from_millis(8),
            average: Duration::from_millis(4),
            constraints: Some(5),
            profile_artifact: None,
        };
        BenchRecord::new(&config, &measurement, EnvironmentInfo::default())
    }

    #[test]
    fn test_append_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let writer = JsonlWriter::new(dir.path().join("nested/runs.jsonl"));

        writer.append(&make_test_record("expo")).unwrap();
        writer.append(&make_test_record("cubic")).unwrap();

        let records = writer.read_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].circuit_name, "expo");
        assert_eq!(records[1].circuit_name, "cubic");
        assert!((records[0].stats.mean_ms - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_schema_version_validation() {
        let dir = tempfile::tempdir().unwrap();
        let writer = JsonlWriter::new(dir.path().join("test.jsonl"));

        let mut record = make_test_record("test");
        record.schema_version = 999;

        let result = writer.append(&record);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("schema version mismatch")
        );
    }

    #[test]
    fn test_write_json_pretty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/record.json");
        write_json(&path, &make_test_record("expo")).unwrap();
        let parsed: BenchRecord = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(parsed.circuit_size, 4);
    }
}
