//! Append-only JSON-lines fingerprint log.
//!
//! One record per line in the collector's log format. A missing file is an
//! empty log. Blank lines are ignored; lines that do not parse as a record
//! are skipped with a warning and counted.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use fl_common::{Error, FingerprintRecord, Result};

use super::FingerprintRepository;
use crate::logging::event_names;

/// Result of reading a log file.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub records: Vec<FingerprintRecord>,
    /// 1-based line numbers that failed to parse.
    pub skipped_lines: Vec<usize>,
}

impl LoadReport {
    pub fn skipped(&self) -> usize {
        self.skipped_lines.len()
    }
}

#[derive(Debug, Clone)]
pub struct JsonlLogStore {
    path: PathBuf,
}

impl JsonlLogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read every parseable record along with the lines that were skipped.
    pub fn load_report(&self) -> Result<LoadReport> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(LoadReport::default())
            }
            Err(e) => return Err(Error::Io(e)),
        };

        let mut report = LoadReport::default();
        // Split on raw bytes so a line of invalid UTF-8 is skipped like any
        // other malformed line instead of failing the whole read.
        for (idx, line) in BufReader::new(file).split(b'\n').enumerate() {
            let line = line?;
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            match parse_line(&line, idx + 1) {
                Ok(record) => report.records.push(record),
                Err(err) => {
                    tracing::warn!(
                        target: event_names::INGEST_LINE_SKIPPED,
                        path = %self.path.display(),
                        line = idx + 1,
                        error = %err,
                        "skipping malformed log line"
                    );
                    report.skipped_lines.push(idx + 1);
                }
            }
        }
        Ok(report)
    }

    /// Truncate the log.
    pub fn reset(&self) -> Result<()> {
        File::create(&self.path)?;
        Ok(())
    }

    fn open_for_append(&self) -> Result<BufWriter<File>> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        Ok(BufWriter::new(file))
    }
}

fn parse_line(line: &[u8], line_no: usize) -> Result<FingerprintRecord> {
    serde_json::from_slice(line).map_err(|e| Error::MalformedRecord {
        line: line_no,
        message: e.to_string(),
    })
}

impl FingerprintRepository for JsonlLogStore {
    fn append(&mut self, record: &FingerprintRecord) -> Result<()> {
        let line = serde_json::to_string(record)?;
        let mut writer = self.open_for_append()?;
        writeln!(writer, "{}", line)?;
        writer.flush()?;
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<FingerprintRecord>> {
        Ok(self.load_report()?.records)
    }
}
