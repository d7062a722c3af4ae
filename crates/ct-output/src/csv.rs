//! CSV output backend.
//!
//! One file per phase, header row first, one row per (step, vehicle).
//! Coordinate pairs are rendered as `[a, b]` in a single quoted field.

use std::fs::File;
use std::path::Path;

use csv::Writer;
use tracing::info;

use crate::row::COLUMNS;
use crate::writer::OutputWriter;
use crate::{OutputResult, TelemetryRow, TelemetryTable};

/// Writes telemetry rows to a single CSV file.
pub struct CsvWriter {
    inner:    Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Create (or truncate) `path` and write the header row.
    pub fn create(path: &Path) -> OutputResult<Self> {
        let mut inner = Writer::from_path(path)?;
        inner.write_record(COLUMNS)?;
        Ok(Self { inner, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_rows(&mut self, rows: &[TelemetryRow]) -> OutputResult<()> {
        for row in rows {
            self.inner.write_record(row.fields())?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.inner.flush()?;
        Ok(())
    }
}

/// Write a finalized table to `path` as CSV.
pub fn export_csv(path: &Path, table: &TelemetryTable) -> OutputResult<()> {
    let mut writer = CsvWriter::create(path)?;
    writer.write_rows(table.rows())?;
    writer.finish()?;
    info!(path = %path.display(), rows = table.len(), "telemetry exported");
    Ok(())
}
