use std::path::PathBuf;

use crate::error::ExportError;
use crate::format::ExportTable;
use crate::paths::{ensure_parent_dir, unique_path};

/// Destination for a finished export table.
pub trait TableSink {
    /// Writes `table` and returns where it ended up.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] if the destination cannot be written.
    fn write_table(&mut self, table: &ExportTable) -> Result<PathBuf, ExportError>;
}

/// Writes a table as CSV: one header row, then one line per record.
///
/// Parent directories are created as needed. An existing file at the target
/// path is never overwritten; the next free `{stem}_{n}` name is used instead.
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TableSink for CsvSink {
    fn write_table(&mut self, table: &ExportTable) -> Result<PathBuf, ExportError> {
        ensure_parent_dir(&self.path)?;
        let target = unique_path(&self.path);

        let mut writer = csv::Writer::from_path(&target)?;
        writer.write_record(&table.columns)?;
        for row in &table.rows {
            writer.write_record(row)?;
        }
        writer.flush().map_err(|e| ExportError::io(&target, e))?;

        tracing::info!(
            path = %target.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            "wrote CSV export"
        );
        Ok(target)
    }
}
