//! Integration tests for loading flight code CSV files.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use flightcode::data::{CsvDataSource, Record};
use flightcode::error::{FlightCodeError, Result};

fn write_csv(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_returns_rows_in_file_order() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let content = "FlightCode,IATACode\nB737-800,738\nA320-200,320\nE190,E90\nB737-700,73G\n";
    let path = write_csv(&dir, "FlightCodes.csv", content);

    let records = CsvDataSource::new().load(&path)?;

    // every line but the header
    assert_eq!(records.len(), content.lines().count() - 1);
    assert_eq!(
        records,
        vec![
            Record::new("B737-800", "738"),
            Record::new("A320-200", "320"),
            Record::new("E190", "E90"),
            Record::new("B737-700", "73G"),
        ]
    );

    Ok(())
}

#[test]
fn test_header_only_file_is_empty() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "empty.csv", "FlightCode,IATACode\n");

    assert!(CsvDataSource::new().load(&path)?.is_empty());

    Ok(())
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = CsvDataSource::new()
        .load(dir.path().join("nope.csv"))
        .unwrap_err();

    assert!(matches!(err, FlightCodeError::Io(_)));
}

#[test]
fn test_wrong_header_is_format_error() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "bad.csv", "Code,Label\nB737,738\n");

    let err = CsvDataSource::new().load(&path).unwrap_err();
    assert!(matches!(err, FlightCodeError::Format(_)));

    // reported eagerly, before any row is read
    assert!(matches!(
        CsvDataSource::new().rows(&path),
        Err(FlightCodeError::Format(_))
    ));
}

#[test]
fn test_load_is_strict_rows_are_not() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "ragged.csv",
        "FlightCode,IATACode\nB737,738\nA320\nE190,E90\n",
    );

    assert!(matches!(
        CsvDataSource::new().load(&path),
        Err(FlightCodeError::Format(_))
    ));

    let rows: Vec<Result<Record>> = CsvDataSource::new().rows(&path)?.collect();
    assert_eq!(rows.len(), 3);
    assert!(rows[0].is_ok());
    assert!(matches!(rows[1], Err(FlightCodeError::Format(_))));
    assert_eq!(rows[2].as_ref().unwrap(), &Record::new("E190", "E90"));

    Ok(())
}

#[test]
fn test_values_are_literal() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "literal.csv", "FlightCode,IATACode\n B737 ,\n");

    let records = CsvDataSource::new().load(&path)?;
    assert_eq!(records, vec![Record::new(" B737 ", "")]);

    let trimmed = CsvDataSource::new().with_trim(true).load(&path)?;
    assert_eq!(trimmed, vec![Record::new("B737", "")]);

    Ok(())
}

#[test]
fn test_rows_can_be_dropped_early() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "codes.csv",
        "FlightCode,IATACode\nB737,738\nA320,320\n",
    );

    let first = CsvDataSource::new().rows(&path)?.next();
    assert_eq!(first.transpose()?, Some(Record::new("B737", "738")));

    // the handle is gone, so the file can be removed and the dir cleaned up
    fs::remove_file(&path).unwrap();
    dir.close().unwrap();

    Ok(())
}
