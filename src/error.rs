//! Error types for the flightcode library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`FlightCodeError`] enum.
//!
//! # Examples
//!
//! ```
//! use flightcode::error::{FlightCodeError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(FlightCodeError::format("header is missing"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for flightcode operations.
#[derive(Error, Debug)]
pub enum FlightCodeError {
    /// I/O errors (missing or unreadable files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed CSV header or row
    #[error("Format error: {0}")]
    Format(String),

    /// A label that the encoder has never seen
    #[error("Unknown label: '{0}'")]
    UnknownLabel(String),

    /// Nothing to train or evaluate on
    #[error("Degenerate dataset: {0}")]
    DegenerateDataset(String),

    /// Tokenizer or featurizer errors
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Invalid configuration or options
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with FlightCodeError.
pub type Result<T> = std::result::Result<T, FlightCodeError>;

impl FlightCodeError {
    /// Create a new format error.
    pub fn format<S: Into<String>>(msg: S) -> Self {
        FlightCodeError::Format(msg.into())
    }

    /// Create a new unknown label error.
    pub fn unknown_label<S: Into<String>>(label: S) -> Self {
        FlightCodeError::UnknownLabel(label.into())
    }

    /// Create a new degenerate dataset error.
    pub fn degenerate<S: Into<String>>(msg: S) -> Self {
        FlightCodeError::DegenerateDataset(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        FlightCodeError::Analysis(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        FlightCodeError::InvalidConfig(msg.into())
    }

    /// Whether this error is confined to a single row and can be skipped.
    pub fn is_row_level(&self) -> bool {
        matches!(
            self,
            FlightCodeError::Format(_) | FlightCodeError::UnknownLabel(_)
        )
    }
}

impl From<csv::Error> for FlightCodeError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            match err.into_kind() {
                csv::ErrorKind::Io(io_err) => FlightCodeError::Io(io_err),
                other => FlightCodeError::Format(format!("{other:?}")),
            }
        } else {
            FlightCodeError::Format(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = FlightCodeError::format("bad header");
        assert_eq!(error.to_string(), "Format error: bad header");

        let error = FlightCodeError::unknown_label("B744");
        assert_eq!(error.to_string(), "Unknown label: 'B744'");

        let error = FlightCodeError::degenerate("no training records");
        assert_eq!(
            error.to_string(),
            "Degenerate dataset: no training records"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = FlightCodeError::from(io_error);

        match error {
            FlightCodeError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_row_level_errors() {
        assert!(FlightCodeError::format("x").is_row_level());
        assert!(FlightCodeError::unknown_label("x").is_row_level());
        assert!(!FlightCodeError::degenerate("x").is_row_level());
    }
}
