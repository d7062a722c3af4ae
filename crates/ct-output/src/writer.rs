//! The `OutputWriter` trait implemented by table backends.

use crate::{OutputResult, TelemetryRow};

pub trait OutputWriter {
    /// Write a batch of finalized rows.
    fn write_rows(&mut self, rows: &[TelemetryRow]) -> OutputResult<()>;

    /// Flush and close the underlying file.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
