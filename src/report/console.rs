use std::io::{self, Write};

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::experiment::ExperimentReport;
use crate::feature::PipelineKind;
use crate::ml::evaluator::{EvaluationReport, Outcome, SampledPrediction};
use crate::ml::trainer::TrainingSummary;
use crate::report::ReportSink;

/// When to emit terminal colors.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color when writing to a terminal
    #[default]
    Auto,
    Always,
    Never,
}

/// Human readable progress and result tables.
///
/// Sampled predictions are collected while a variant is evaluated and
/// printed as one table when it finishes, correct rows in green and
/// incorrect rows in red.
#[derive(Debug)]
pub struct ConsoleSink<W: Write = io::Stdout> {
    out: W,
    color: ColorMode,
    progress: bool,
    samples: Vec<SampledPrediction>,
}

impl ConsoleSink {
    /// A sink writing to standard output.
    pub fn stdout(color: ColorMode) -> Self {
        ConsoleSink::new(io::stdout(), color)
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W, color: ColorMode) -> Self {
        ConsoleSink {
            out,
            color,
            progress: true,
            samples: Vec::new(),
        }
    }

    /// Print progress lines and samples (default `true`). When off only the
    /// final comparison is written.
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Give back the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL_CONDENSED)
            .apply_modifier(UTF8_ROUND_CORNERS);
        match self.color {
            ColorMode::Auto => {}
            ColorMode::Always => {
                table.enforce_styling();
            }
            ColorMode::Never => {
                table.force_no_tty();
            }
        }
        table
    }

    fn sample_table(&self) -> Table {
        let mut table = self.table();
        table.set_header(vec![
            header_cell("#"),
            header_cell("Code"),
            header_cell("Expected"),
            header_cell("Predicted"),
            header_cell("Confidence"),
        ]);
        for sample in &self.samples {
            let color = match sample.outcome {
                Outcome::Correct => Color::Green,
                Outcome::Incorrect => Color::Red,
            };
            table.add_row(vec![
                Cell::new(format!("{} {}", sample.outcome, sample.count)).fg(color),
                Cell::new(&sample.code).fg(color),
                Cell::new(&sample.expected).fg(color),
                Cell::new(&sample.predicted).fg(color),
                Cell::new(format!("{:.4}", sample.confidence)).fg(color),
            ]);
        }
        align_column(&mut table, 4, CellAlignment::Right);
        table
    }

    fn comparison_table(&self, report: &ExperimentReport) -> Table {
        let mut table = self.table();
        table.load_preset(UTF8_FULL).apply_modifier(UTF8_ROUND_CORNERS);
        table.set_header(vec![
            header_cell("Variant"),
            header_cell("Training (s)"),
            header_cell("Correct"),
            header_cell("Incorrect"),
            header_cell("Unknown labels"),
            header_cell("Malformed"),
            header_cell("Accuracy"),
        ]);

        let best = report.best().map(|r| r.evaluation.variant);
        for result in &report.results {
            let evaluation = &result.evaluation;
            let mut accuracy = Cell::new(format!("{:.4}", evaluation.accuracy()));
            if Some(evaluation.variant) == best {
                accuracy = accuracy.fg(Color::Green).add_attribute(Attribute::Bold);
            }
            table.add_row(vec![
                Cell::new(evaluation.variant).fg(Color::Cyan),
                Cell::new(format!("{:.3}", result.training.elapsed_secs())),
                Cell::new(evaluation.correct),
                count_cell(evaluation.incorrect, Color::Red),
                count_cell(evaluation.unknown_labels, Color::Yellow),
                count_cell(evaluation.malformed_rows, Color::Yellow),
                accuracy,
            ]);
        }
        for index in 1..=6 {
            align_column(&mut table, index, CellAlignment::Right);
        }
        table
    }
}

impl<W: Write> ReportSink for ConsoleSink<W> {
    fn training_started(&mut self, variant: PipelineKind) -> Result<()> {
        if !self.progress {
            return Ok(());
        }
        writeln!(self.out, "Training {variant} model...")?;
        Ok(())
    }

    fn training_finished(&mut self, summary: &TrainingSummary) -> Result<()> {
        if !self.progress {
            return Ok(());
        }
        writeln!(
            self.out,
            "Trained {} on {} records ({} classes, {} features) in {:.3} secs",
            summary.variant,
            summary.records,
            summary.classes,
            summary.dimension,
            summary.elapsed_secs()
        )?;
        Ok(())
    }

    fn evaluation_started(&mut self, variant: PipelineKind) -> Result<()> {
        self.samples.clear();
        if !self.progress {
            return Ok(());
        }
        writeln!(self.out, "Evaluating {variant} model...")?;
        Ok(())
    }

    fn sample(&mut self, sample: &SampledPrediction) -> Result<()> {
        if self.progress {
            self.samples.push(sample.clone());
        }
        Ok(())
    }

    fn evaluation_finished(&mut self, report: &EvaluationReport) -> Result<()> {
        if !self.samples.is_empty() {
            let table = self.sample_table();
            writeln!(self.out, "{table}")?;
            self.samples.clear();
        }
        if !self.progress {
            return Ok(());
        }
        writeln!(
            self.out,
            "{} accuracy: {:.4} ({} correct, {} incorrect)",
            report.variant,
            report.accuracy(),
            report.correct,
            report.incorrect
        )?;
        Ok(())
    }

    fn comparison(&mut self, report: &ExperimentReport) -> Result<()> {
        let table = self.comparison_table(report);
        writeln!(self.out, "{table}")?;
        writeln!(self.out, "{}", report.headline())?;
        self.out.flush()?;
        Ok(())
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    let cell = Cell::new(count);
    if count > 0 { cell.fg(color) } else { cell }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Record;
    use crate::experiment::{Experiment, ExperimentConfig};
    use crate::ml::evaluator::SamplingPolicy;

    fn run_to_string() -> String {
        let training = vec![
            Record::new("AAAA", "X"),
            Record::new("BBBB", "Y"),
            Record::new("CCCC", "Z"),
        ];
        let evaluation = vec![Record::new("AAAA", "X"), Record::new("BBBB", "W")];
        let config = ExperimentConfig {
            sampling: SamplingPolicy {
                correct_every: 1,
                incorrect_every: 1,
            },
            ..ExperimentConfig::default()
        };

        let mut sink = ConsoleSink::new(Vec::new(), ColorMode::Never);
        Experiment::run_records(&config, &training, &evaluation, &mut sink).unwrap();
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn test_console_output() {
        let output = run_to_string();

        assert!(output.contains("Training WholeString model..."));
        assert!(output.contains("Evaluating CharTrigram model..."));
        assert!(output.contains("CharTrigram accuracy: 0.5000 (1 correct, 1 incorrect)"));
        assert!(output.contains("WholeString: 0.5000, CharTrigram: 0.5000"));
        // samples table lists both rows
        assert!(output.contains("incorrect 1"));
        assert!(output.contains("correct 1"));
    }

    #[test]
    fn test_without_progress() {
        let training = vec![Record::new("AAAA", "X"), Record::new("BBBB", "Y")];
        let mut sink = ConsoleSink::new(Vec::new(), ColorMode::Never).with_progress(false);
        Experiment::run_records(&ExperimentConfig::default(), &training, &training, &mut sink)
            .unwrap();
        let output = String::from_utf8(sink.into_inner()).unwrap();

        assert!(!output.contains("Training WholeString model..."));
        assert!(!output.contains("Evaluating CharTrigram model..."));
        // the comparison table is still printed
        assert!(output.contains("Training (s)"));
        assert!(output.contains("WholeString: 1.0000, CharTrigram: 1.0000"));
    }

    #[test]
    fn test_never_has_no_escape_codes() {
        assert!(!run_to_string().contains('\u{1b}'));
    }
}
