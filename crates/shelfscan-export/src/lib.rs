//! Turns deduplicated product records into a tabular export: column layout
//! with run metadata, output path naming, and the CSV sink.

pub mod error;
pub mod format;
pub mod paths;
pub mod sink;

pub use error::ExportError;
pub use format::{format_table, ExportTable, RunMetadata, METADATA_COLUMNS};
pub use paths::{archive_copy, render_output_path, slugify, unique_path, OutputVars};
pub use sink::{CsvSink, TableSink};
