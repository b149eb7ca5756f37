//! Labeled flight code data.
//!
//! A [`Record`] pairs a raw flight code with its IATA aircraft code. Records
//! are read from CSV files by [`CsvDataSource`], which binds columns through
//! an explicit [`RecordSchema`] rather than per-type annotations.

pub mod record;
pub mod schema;
pub mod source;

pub use record::Record;
pub use schema::{ColumnKind, ColumnSpec, RecordField, RecordSchema};
pub use source::{CsvDataSource, RecordRows};
