use std::io::{self, Write};

use crate::error::Result;
use crate::experiment::ExperimentReport;
use crate::report::ReportSink;

/// Writes the final [`ExperimentReport`] as pretty-printed JSON.
///
/// Progress events are left to the log.
#[derive(Debug)]
pub struct JsonSink<W: Write = io::Stdout> {
    out: W,
}

impl JsonSink {
    /// A sink writing to standard output.
    pub fn stdout() -> Self {
        JsonSink { out: io::stdout() }
    }
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        JsonSink { out }
    }

    /// Give back the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for JsonSink<W> {
    fn comparison(&mut self, report: &ExperimentReport) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.out, report)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}
