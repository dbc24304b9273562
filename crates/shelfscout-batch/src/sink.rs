//! Record sinks

use crate::error::BatchError;
use shelfscout_domain::traits::RecordSink;
use shelfscout_domain::ItemRecord;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Keeps records in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Vec<ItemRecord>,
    writes: usize,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Records written so far
    pub fn records(&self) -> &[ItemRecord] {
        &self.records
    }

    /// Number of write calls received
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Take the records out of the sink
    pub fn into_records(self) -> Vec<ItemRecord> {
        self.records
    }
}

impl RecordSink for MemorySink {
    type Error = BatchError;

    fn write(&mut self, records: &[ItemRecord]) -> Result<(), Self::Error> {
        self.writes += 1;
        self.records.extend_from_slice(records);
        Ok(())
    }
}

/// Appends one JSON object per record to a file
pub struct JsonLinesSink {
    path: PathBuf,
    writer: BufWriter<File>,
    written: usize,
}

impl JsonLinesSink {
    /// Create or truncate the file at `path`
    pub fn create(path: impl AsRef<Path>) -> Result<Self, BatchError> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)
            .map_err(|e| BatchError::Sink(format!("cannot create {}: {}", path.display(), e)))?;
        Ok(Self::from_file(path, file))
    }

    /// Open the file at `path` for appending, creating it if missing
    pub fn append(path: impl AsRef<Path>) -> Result<Self, BatchError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| BatchError::Sink(format!("cannot open {}: {}", path.display(), e)))?;
        Ok(Self::from_file(path, file))
    }

    fn from_file(path: PathBuf, file: File) -> Self {
        Self {
            path,
            writer: BufWriter::new(file),
            written: 0,
        }
    }

    /// Destination path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records written through this sink
    pub fn written(&self) -> usize {
        self.written
    }
}

impl RecordSink for JsonLinesSink {
    type Error = BatchError;

    fn write(&mut self, records: &[ItemRecord]) -> Result<(), Self::Error> {
        for record in records {
            let line = serde_json::to_string(record)
                .map_err(|e| BatchError::Sink(format!("cannot encode row {}: {}", record.row_number, e)))?;
            writeln!(self.writer, "{}", line)?;
        }
        self.writer.flush()?;
        self.written += records.len();
        Ok(())
    }
}
