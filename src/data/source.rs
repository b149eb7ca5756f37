//! CSV data source.
//!
//! Reads delimited files with a header row into [`Record`]s:
//!
//! ```csv
//! FlightCode,IATACode
//! B737-800,738
//! A320-200,320
//! ```
//!
//! [`CsvDataSource::load`] reads the whole file eagerly and fails on the
//! first malformed row. [`CsvDataSource::rows`] streams rows lazily and
//! reports each malformed row individually, leaving the skip-or-abort
//! decision to the caller. Either way the file handle lives inside the
//! reader and is closed when the reader is dropped.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::data::record::Record;
use crate::data::schema::{RecordField, RecordSchema};
use crate::error::{FlightCodeError, Result};

/// A data source for comma-delimited record files.
#[derive(Clone, Debug)]
pub struct CsvDataSource {
    /// Column bindings
    schema: RecordSchema,
    /// CSV delimiter character (default: ',')
    delimiter: u8,
    /// Whether to trim whitespace from values
    trim: bool,
}

impl Default for CsvDataSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvDataSource {
    /// Create a data source for the `FlightCode,IATACode` layout.
    pub fn new() -> Self {
        CsvDataSource {
            schema: RecordSchema::flight_codes(),
            delimiter: b',',
            trim: false,
        }
    }

    /// Use a custom column schema.
    pub fn with_schema(mut self, schema: RecordSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Set a custom delimiter character.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if `delimiter` is not a single ASCII byte.
    pub fn with_delimiter(mut self, delimiter: char) -> Result<Self> {
        if !delimiter.is_ascii() {
            return Err(FlightCodeError::invalid_config(format!(
                "delimiter {delimiter:?} is not ASCII"
            )));
        }
        self.delimiter = delimiter as u8;
        Ok(self)
    }

    /// Set whether to trim whitespace from values.
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// The column schema in use.
    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    /// Read every record of the file at `path`, in file order.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be opened or read, `Format` if the header does
    /// not match the schema or any row has the wrong number of columns.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Record>> {
        let path = path.as_ref();
        let records = self.rows(path)?.collect::<Result<Vec<_>>>()?;
        log::debug!("Loaded {} records from {}", records.len(), path.display());
        Ok(records)
    }

    /// Stream the records of the file at `path`.
    ///
    /// The header is validated before this returns; rows are parsed as the
    /// iterator advances.
    pub fn rows<P: AsRef<Path>>(&self, path: P) -> Result<RecordRows<File>> {
        let file = File::open(path.as_ref())?;
        self.read(file)
    }

    /// Stream records from any reader.
    pub fn read<R: Read>(&self, reader: R) -> Result<RecordRows<R>> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let header = reader.headers()?.clone();
        self.schema.validate_header(header.iter())?;

        let code_index = self.column_index(RecordField::Code)?;
        let label_index = self.column_index(RecordField::Label)?;

        Ok(RecordRows {
            reader,
            row: StringRecord::new(),
            header_len: header.len(),
            code_index,
            label_index,
            trim: self.trim,
        })
    }

    fn column_index(&self, field: RecordField) -> Result<usize> {
        self.schema
            .column(field)
            .map(|c| c.source_index)
            .ok_or_else(|| FlightCodeError::invalid_config(format!("schema has no {field:?} column")))
    }
}

/// Lazy iterator over the records of a CSV source.
///
/// Yields one `Result` per data row. A malformed row yields a `Format` error
/// and iteration can continue with the next row.
pub struct RecordRows<R> {
    reader: csv::Reader<R>,
    row: StringRecord,
    header_len: usize,
    code_index: usize,
    label_index: usize,
    trim: bool,
}

impl<R: Read> RecordRows<R> {
    fn field(&self, index: usize) -> String {
        let value = self.row.get(index).unwrap_or_default();
        if self.trim {
            value.trim().to_string()
        } else {
            value.to_string()
        }
    }
}

impl<R: Read> Iterator for RecordRows<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.row) {
            Ok(false) => None,
            Ok(true) => {
                if self.row.len() != self.header_len {
                    let line = self.row.position().map(|p| p.line()).unwrap_or_default();
                    return Some(Err(FlightCodeError::format(format!(
                        "line {}: expected {} fields, found {}",
                        line,
                        self.header_len,
                        self.row.len()
                    ))));
                }
                Some(Ok(Record::new(
                    self.field(self.code_index),
                    self.field(self.label_index),
                )))
            }
            Err(e) => Some(Err(e.into())),
        }
    }
}

impl<R> std::fmt::Debug for RecordRows<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordRows")
            .field("header_len", &self.header_len)
            .field("code_index", &self.code_index)
            .field("label_index", &self.label_index)
            .field("trim", &self.trim)
            .finish()
    }
}
