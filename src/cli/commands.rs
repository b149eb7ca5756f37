//! Command implementations for the flightcode CLI.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::data::CsvDataSource;
use crate::error::Result;
use crate::experiment::{DEFAULT_TRAINING_PATH, Experiment, ExperimentConfig};
use crate::ml::classifier::TrainerOptions;
use crate::ml::predictor::Predictor;
use crate::ml::trainer::Trainer;
use crate::report::{ConsoleSink, JsonSink};

/// Execute a CLI command.
pub fn execute_command(args: FlightCodeArgs) -> Result<()> {
    match &args.command {
        Command::Run(run_args) => run_experiment(run_args, &args),
        Command::Predict(predict_args) => predict_codes(predict_args, &args),
    }
}

/// Train and evaluate every selected variant.
fn run_experiment(args: &RunArgs, cli_args: &FlightCodeArgs) -> Result<()> {
    let config = experiment_config(args)?;

    if cli_args.verbosity() > 1 {
        println!(
            "Training on {}, evaluating on {}",
            config.training_path.display(),
            config.evaluation_path.display()
        );
    }

    let result = match args.output_format {
        OutputFormat::Human => {
            let mut sink =
                ConsoleSink::stdout(cli_args.color).with_progress(cli_args.verbosity() > 0);
            Experiment::run(&config, &mut sink)
        }
        OutputFormat::Json => Experiment::run(&config, &mut JsonSink::stdout()),
    };

    if args.pause {
        // the prompt goes to stderr so it never mixes with a JSON report
        return pause_before_exit(result, io::stdin().lock(), io::stderr()).map(|_| ());
    }

    result.map(|_| ())
}

/// Build the experiment config: the config file (or defaults) with flags on top.
pub fn experiment_config(args: &RunArgs) -> Result<ExperimentConfig> {
    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            ExperimentConfig::from_json_file(path)?
        }
        None => ExperimentConfig::default(),
    };

    if let Some(path) = &args.train {
        config.training_path = path.clone();
    }
    if let Some(path) = &args.test {
        config.evaluation_path = path.clone();
    }
    if let Some(variant) = args.variant {
        config.variants = variant.kinds();
    }
    if let Some(seed) = args.seed {
        config.trainer.seed = seed;
    }
    if let Some(epochs) = args.epochs {
        config.trainer.epochs = epochs;
    }
    if let Some(policy) = args.on_malformed {
        config.malformed_rows = policy;
    }

    config.validate()?;
    Ok(config)
}

/// Train one variant and label each code.
fn predict_codes(args: &PredictArgs, cli_args: &FlightCodeArgs) -> Result<()> {
    let path = args
        .train
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TRAINING_PATH));
    let records = CsvDataSource::new().load(&path)?;

    let mut trainer = Trainer::new(args.variant);
    if let Some(seed) = args.seed {
        let options = trainer.options().clone();
        trainer = trainer.with_options(TrainerOptions { seed, ..options });
    }
    let model = trainer.train(&records)?;

    if cli_args.verbosity() > 1 {
        println!(
            "Trained {} on {} records in {:.3} secs",
            args.variant,
            records.len(),
            model.summary().elapsed_secs()
        );
    }

    let predictor = Predictor::new(&model);
    let predictions = args
        .codes
        .iter()
        .map(|code| {
            let prediction = predictor.predict_code(code)?;
            Ok(CodePrediction::new(code, prediction, model.labels().labels()))
        })
        .collect::<Result<Vec<_>>>()?;

    output_predictions(&predictions, args.output_format, cli_args.color)
}

/// Wait for a line on `input`, then hand back `result`. An error from the
/// run takes precedence over one from the prompt.
fn pause_before_exit<T>(
    result: Result<T>,
    mut input: impl BufRead,
    mut prompt: impl Write,
) -> Result<T> {
    let paused = write!(prompt, "Press Enter to exit...")
        .and_then(|_| prompt.flush())
        .and_then(|_| input.read_line(&mut String::new()));

    let value = result?;
    paused?;
    Ok(value)
}
