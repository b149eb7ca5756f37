//! Command line argument parsing for the flightcode CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::feature::PipelineKind;
use crate::ml::evaluator::MalformedRowPolicy;
use crate::report::ColorMode;

/// flightcode - classify flight codes into IATA aircraft type labels
#[derive(Parser, Debug, Clone)]
#[command(name = "flightcode")]
#[command(about = "Train and compare flight code classifiers")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct FlightCodeArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// When to color the output
    #[arg(long, value_enum, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl FlightCodeArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train every variant and compare accuracy on a held-out file
    Run(RunArgs),

    /// Train one variant and label the given codes
    Predict(PredictArgs),
}

/// Arguments for an experiment run
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Training CSV (FlightCode,IATACode)
    #[arg(long)]
    pub train: Option<PathBuf>,

    /// Evaluation CSV (FlightCode,IATACode)
    #[arg(long)]
    pub test: Option<PathBuf>,

    /// JSON experiment config; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Variants to run
    #[arg(long, value_enum)]
    pub variant: Option<VariantChoice>,

    /// Seed for training
    #[arg(long)]
    pub seed: Option<u64>,

    /// Passes over the training set
    #[arg(long)]
    pub epochs: Option<usize>,

    /// What to do with malformed evaluation rows (skip or fail)
    #[arg(long)]
    pub on_malformed: Option<MalformedRowPolicy>,

    /// Wait for Enter before exiting
    #[arg(long)]
    pub pause: bool,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value = "human")]
    pub output_format: OutputFormat,
}

/// Arguments for labelling codes
#[derive(Args, Debug, Clone)]
pub struct PredictArgs {
    /// Training CSV (FlightCode,IATACode)
    #[arg(long)]
    pub train: Option<PathBuf>,

    /// Variant to train (whole-string or char-trigram)
    #[arg(long, default_value = "char-trigram")]
    pub variant: PipelineKind,

    /// Seed for training
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value = "human")]
    pub output_format: OutputFormat,

    /// Flight codes to label
    #[arg(required = true)]
    pub codes: Vec<String>,
}

/// Which variants an experiment runs
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantChoice {
    Both,
    WholeString,
    CharTrigram,
}

impl VariantChoice {
    /// The selected variants in run order.
    pub fn kinds(self) -> Vec<PipelineKind> {
        match self {
            VariantChoice::Both => PipelineKind::ALL.to_vec(),
            VariantChoice::WholeString => vec![PipelineKind::WholeString],
            VariantChoice::CharTrigram => vec![PipelineKind::CharTrigram],
        }
    }
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable tables
    Human,
    /// JSON
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run() {
        let args = FlightCodeArgs::try_parse_from([
            "flightcode",
            "-vv",
            "run",
            "--train",
            "a.csv",
            "--test",
            "b.csv",
            "--variant",
            "char-trigram",
            "--seed",
            "42",
            "--on-malformed",
            "fail",
            "--pause",
        ])
        .unwrap();

        assert_eq!(args.verbosity(), 2);
        match args.command {
            Command::Run(run) => {
                assert_eq!(run.train, Some(PathBuf::from("a.csv")));
                assert_eq!(run.variant, Some(VariantChoice::CharTrigram));
                assert_eq!(run.seed, Some(42));
                assert_eq!(run.on_malformed, Some(MalformedRowPolicy::Fail));
                assert!(run.pause);
                assert_eq!(run.output_format, OutputFormat::Human);
            }
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_predict() {
        let args = FlightCodeArgs::try_parse_from([
            "flightcode",
            "predict",
            "--variant",
            "whole-string",
            "B737",
            "A320",
            "--quiet",
        ])
        .unwrap();

        assert_eq!(args.verbosity(), 0);
        match args.command {
            Command::Predict(predict) => {
                assert_eq!(predict.variant, PipelineKind::WholeString);
                assert_eq!(predict.codes, vec!["B737", "A320"]);
            }
            other => panic!("expected predict, got {other:?}"),
        }
    }

    #[test]
    fn test_predict_requires_codes() {
        assert!(FlightCodeArgs::try_parse_from(["flightcode", "predict"]).is_err());
    }

    #[test]
    fn test_variant_choice() {
        assert_eq!(VariantChoice::Both.kinds(), PipelineKind::ALL.to_vec());
        assert_eq!(
            VariantChoice::WholeString.kinds(),
            vec![PipelineKind::WholeString]
        );
    }
}
