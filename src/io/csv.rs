use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::GncError;
use crate::telemetry::{TelemetryRecord, TelemetrySink};

/// Streams telemetry records to CSV, one row per tick.
///
/// Columns follow the field order of [`TelemetryRecord`]; the header row is
/// written with the first record.
pub struct CsvSink<W: Write> {
    writer: ::csv::Writer<W>,
    rows: usize,
}

impl<W: Write> CsvSink<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: ::csv::Writer::from_writer(inner),
            rows: 0,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn flush(&mut self) -> Result<(), GncError> {
        self.writer.flush().map_err(::csv::Error::from)?;
        Ok(())
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(self) -> Result<W, GncError> {
        self.writer
            .into_inner()
            .map_err(|e| GncError::Csv(::csv::Error::from(e.into_error())))
    }
}

impl CsvSink<File> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, GncError> {
        let writer = ::csv::Writer::from_path(path)?;
        Ok(Self { writer, rows: 0 })
    }
}

impl<W: Write> TelemetrySink for CsvSink<W> {
    fn record(&mut self, record: &TelemetryRecord) -> Result<(), GncError> {
        self.writer.serialize(record)?;
        self.rows += 1;
        Ok(())
    }
}
