use anyhow::{Result, Context};
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::core::ResourceType;

/// Columns per report row: sequence number, URI, type label.
pub const REPORT_COLUMNS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub sequence: u64,
    pub uri: String,
    pub resource_type: ResourceType,
}

impl ResourceRecord {
    pub fn new(sequence: u64, uri: String, resource_type: ResourceType) -> Self {
        Self { sequence, uri, resource_type }
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("malformed report row at line {line}: expected 3 columns, found {fields}")]
    MalformedRow { line: u64, fields: usize },
}

/// Return the set of URIs already present in the report at `path`.
///
/// A report that does not exist yet yields an empty set.
pub fn read_completed_uris<P: AsRef<Path>>(path: P) -> Result<HashSet<String>> {
    let path = path.as_ref();
    if !path.exists() {
        debug!("No existing report at {}", path.display());
        return Ok(HashSet::new());
    }

    info!("Reading existing output file {}", path.display());
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open report: {}", path.display()))?;

    let mut uris = HashSet::new();
    for row in reader.records() {
        let row = row.with_context(|| format!("Failed to read report: {}", path.display()))?;
        if row.len() != REPORT_COLUMNS {
            let line = row.position().map(|p| p.line()).unwrap_or_default();
            return Err(ReportError::MalformedRow { line, fields: row.len() })
                .with_context(|| format!("Invalid report: {}", path.display()));
        }
        uris.insert(row[1].to_string());
    }

    info!("{} files already checked", uris.len());
    Ok(uris)
}

/// Append-only writer for the report. Every row is flushed and synced to
/// disk before [`ReportWriter::append`] returns.
pub struct ReportWriter {
    writer: csv::Writer<File>,
    path: PathBuf,
}

impl ReportWriter {
    pub fn open_append<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open report for append: {}", path.display()))?;

        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(file);

        Ok(Self { writer, path })
    }

    pub fn append(&mut self, record: &ResourceRecord) -> Result<()> {
        let sequence = record.sequence.to_string();
        self.writer
            .write_record([sequence.as_str(), record.uri.as_str(), record.resource_type.as_str()])
            .with_context(|| format!("Failed to write report row: {}", self.path.display()))?;
        self.writer.flush()
            .with_context(|| format!("Failed to flush report: {}", self.path.display()))?;
        self.writer.get_ref().sync_data()
            .with_context(|| format!("Failed to sync report: {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_report_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let uris = read_completed_uris(dir.path().join("report.csv")).unwrap();
        assert!(uris.is_empty());
    }

    #[test]
    fn test_append_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");

        let mut writer = ReportWriter::open_append(&path).unwrap();
        writer.append(&ResourceRecord::new(1, "http://x/a".to_string(), ResourceType::Issue)).unwrap();
        writer.append(&ResourceRecord::new(2, "http://x/b,c".to_string(), ResourceType::File)).unwrap();

        // rows are on disk before the writer is dropped
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "1,http://x/a,issue\n2,\"http://x/b,c\",file\n");

        let uris = read_completed_uris(&path).unwrap();
        assert_eq!(uris.len(), 2);
        assert!(uris.contains("http://x/b,c"));
    }

    #[test]
    fn test_reopen_appends_without_rewriting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        fs::write(&path, "1,http://x/a,page\n").unwrap();

        let mut writer = ReportWriter::open_append(&path).unwrap();
        writer.append(&ResourceRecord::new(2, "http://x/b".to_string(), ResourceType::Unknown)).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "1,http://x/a,page\n2,http://x/b,unknown\n");
    }

    #[test]
    fn test_malformed_row_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        fs::write(&path, "1,http://x/a,page\n2,http://x/b\n").unwrap();

        let err = read_completed_uris(&path).unwrap_err();
        match err.downcast_ref::<ReportError>() {
            Some(ReportError::MalformedRow { line, fields }) => {
                assert_eq!(*line, 2);
                assert_eq!(*fields, 2);
            }
            None => panic!("unexpected error: {err:?}"),
        }
    }
}
