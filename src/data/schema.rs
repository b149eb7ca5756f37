//! Column schema descriptors for record files.
//!
//! A schema is an ordered list of `(name, kind, source index)` descriptors,
//! each bound to a [`RecordField`]. The data source validates the file header
//! against it and reads every row through it.
//!
//! # Examples
//!
//! ```
//! use flightcode::data::schema::{RecordField, RecordSchema};
//!
//! let schema = RecordSchema::flight_codes();
//! assert_eq!(schema.column(RecordField::Code).unwrap().name, "FlightCode");
//! assert_eq!(schema.column(RecordField::Label).unwrap().source_index, 1);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{FlightCodeError, Result};

/// The record field a column is bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordField {
    /// The classifier input
    Code,
    /// The target class
    Label,
}

/// The value type of a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Raw UTF-8 text, kept verbatim
    Text,
}

/// Descriptor for a single column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Expected header name
    pub name: String,
    /// Value type
    pub kind: ColumnKind,
    /// Zero-based column index in the source file
    pub source_index: usize,
    /// Record field the column populates
    pub field: RecordField,
}

/// Ordered column descriptors for a record file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSchema {
    columns: Vec<ColumnSpec>,
}

impl Default for RecordSchema {
    fn default() -> Self {
        Self::flight_codes()
    }
}

impl RecordSchema {
    /// Create a schema from column descriptors.
    ///
    /// # Errors
    ///
    /// Fails if a record field is bound zero or several times, or if two
    /// columns read the same source index.
    pub fn new(columns: Vec<ColumnSpec>) -> Result<Self> {
        for field in [RecordField::Code, RecordField::Label] {
            let bound = columns.iter().filter(|c| c.field == field).count();
            if bound != 1 {
                return Err(FlightCodeError::invalid_config(format!(
                    "schema must bind {field:?} exactly once, found {bound}"
                )));
            }
        }

        let mut indices: Vec<usize> = columns.iter().map(|c| c.source_index).collect();
        indices.sort_unstable();
        indices.dedup();
        if indices.len() != columns.len() {
            return Err(FlightCodeError::invalid_config(
                "schema columns must read distinct source indices",
            ));
        }

        Ok(Self { columns })
    }

    /// The `FlightCode,IATACode` layout of the training files.
    pub fn flight_codes() -> Self {
        Self {
            columns: vec![
                ColumnSpec {
                    name: "FlightCode".to_string(),
                    kind: ColumnKind::Text,
                    source_index: 0,
                    field: RecordField::Code,
                },
                ColumnSpec {
                    name: "IATACode".to_string(),
                    kind: ColumnKind::Text,
                    source_index: 1,
                    field: RecordField::Label,
                },
            ],
        }
    }

    /// All column descriptors in declaration order.
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// The column bound to `field`.
    pub fn column(&self, field: RecordField) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.field == field)
    }

    /// Check a header row against the schema.
    pub fn validate_header<'a, I>(&self, header: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let header: Vec<&str> = header.into_iter().collect();
        if header.is_empty() || header.iter().all(|h| h.trim().is_empty()) {
            return Err(FlightCodeError::format("CSV header is missing"));
        }

        for column in &self.columns {
            match header.get(column.source_index) {
                Some(name) if name.trim() == column.name => {}
                Some(name) => {
                    return Err(FlightCodeError::format(format!(
                        "header column {} is '{}', expected '{}'",
                        column.source_index,
                        name.trim(),
                        column.name
                    )));
                }
                None => {
                    return Err(FlightCodeError::format(format!(
                        "header has {} columns, expected column '{}' at index {}",
                        header.len(),
                        column.name,
                        column.source_index
                    )));
                }
            }
        }

        Ok(())
    }
}
