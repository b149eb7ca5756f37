//! End-to-end tests: train both variants from CSV files and evaluate them.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use flightcode::data::{CsvDataSource, Record};
use flightcode::error::{FlightCodeError, Result};
use flightcode::experiment::{Experiment, ExperimentConfig};
use flightcode::feature::PipelineKind;
use flightcode::ml::{Evaluator, MalformedRowPolicy, Predictor, SamplingPolicy, Trainer};
use flightcode::report::{JsonSink, MemorySink, ReportEvent};

fn write_csv(dir: &TempDir, name: &str, rows: &[(&str, &str)]) -> PathBuf {
    let mut content = String::from("FlightCode,IATACode\n");
    for (code, label) in rows {
        content.push_str(&format!("{code},{label}\n"));
    }
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn config(training_path: PathBuf, evaluation_path: PathBuf) -> ExperimentConfig {
    ExperimentConfig {
        training_path,
        evaluation_path,
        ..ExperimentConfig::default()
    }
}

/// Codes of distinct families with no trigram in common across labels.
fn fleet() -> Vec<(&'static str, &'static str)> {
    vec![
        ("B737-800", "738"),
        ("B737-8AS", "738"),
        ("A320-214", "320"),
        ("A320-232", "320"),
        ("E190LR", "E90"),
        ("E190AR", "E90"),
        ("CRJ900", "CR9"),
        ("CRJ9ER", "CR9"),
    ]
}

#[test]
fn test_small_training_set_both_variants() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let training = write_csv(
        &dir,
        "train.csv",
        &[("AA100", "B737"), ("AA200", "A320"), ("AA300", "B737")],
    );
    let evaluation = write_csv(&dir, "test.csv", &[("AA150", "B737")]);

    let records = CsvDataSource::new().load(&training)?;
    for kind in PipelineKind::ALL {
        let model = Trainer::new(kind).train(&records)?;
        let prediction = Predictor::new(&model).predict(&Record::new("AA150", "B737"))?;

        assert!(prediction.label == "B737" || prediction.label == "A320");
        assert_eq!(prediction.scores.len(), 2);
        let sum: f32 = prediction.scores.iter().sum();
        assert!((sum - 1.0).abs() < 1e-4, "{kind} scores sum to {sum}");
        assert_eq!(prediction.confidence(), prediction.scores[0].max(prediction.scores[1]));
    }

    let report = Experiment::run(&config(training, evaluation), &mut MemorySink::new())?;
    assert_eq!(report.results.len(), 2);
    for result in &report.results {
        assert_eq!(result.evaluation.total(), 1);
        let accuracy = result.evaluation.accuracy();
        assert!((0.0..=1.0).contains(&accuracy));
    }

    Ok(())
}

#[test]
fn test_memorizes_separable_training_set() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "fleet.csv", &fleet());

    let report = Experiment::run(&config(path.clone(), path), &mut MemorySink::new())?;

    assert_eq!(report.accuracy(PipelineKind::WholeString), Some(1.0));
    assert_eq!(report.accuracy(PipelineKind::CharTrigram), Some(1.0));

    Ok(())
}

#[test]
fn test_same_seed_same_results() -> Result<()> {
    let records: Vec<Record> = fleet().into_iter().map(Record::from).collect();
    let unseen_codes = ["B737-900", "A321", "E195", "CRJ700", "ZZZ"];

    for kind in PipelineKind::ALL {
        let first = Trainer::new(kind).train(&records)?;
        let second = Trainer::new(kind).train(&records)?;

        assert_eq!(first.classifier(), second.classifier());
        for code in unseen_codes {
            let a = Predictor::new(&first).predict_code(code)?;
            let b = Predictor::new(&second).predict_code(code)?;
            assert_eq!(a, b, "{kind} differs on {code}");
        }
    }

    Ok(())
}

#[test]
fn test_unknown_labels_count_as_incorrect() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let training = write_csv(&dir, "train.csv", &fleet());
    let evaluation = write_csv(
        &dir,
        "test.csv",
        &[("B737-800", "738"), ("DHC8-400", "DH4"), ("A320-214", "320")],
    );

    let report = Experiment::run(&config(training, evaluation), &mut MemorySink::new())?;
    for result in &report.results {
        assert_eq!(result.evaluation.unknown_labels, 1);
        assert_eq!(result.evaluation.incorrect, 1);
        assert_eq!(result.evaluation.correct, 2);
    }

    Ok(())
}

#[test]
fn test_malformed_evaluation_rows() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let training = write_csv(&dir, "train.csv", &fleet());
    let evaluation = dir.path().join("test.csv");
    fs::write(
        &evaluation,
        "FlightCode,IATACode\nB737-800,738\nA320-214\nE190LR,E90,extra\nCRJ900,CR9\n",
    )
    .unwrap();

    let skip = config(training.clone(), evaluation.clone());
    let report = Experiment::run(&skip, &mut MemorySink::new())?;
    for result in &report.results {
        assert_eq!(result.evaluation.malformed_rows, 2);
        assert_eq!(result.evaluation.correct, 2);
        assert_eq!(result.evaluation.incorrect, 2);
    }

    let fail = ExperimentConfig {
        malformed_rows: MalformedRowPolicy::Fail,
        ..config(training, evaluation)
    };
    assert!(matches!(
        Experiment::run(&fail, &mut MemorySink::new()),
        Err(FlightCodeError::Format(_))
    ));

    Ok(())
}

#[test]
fn test_malformed_training_rows_abort() {
    let dir = TempDir::new().unwrap();
    let training = dir.path().join("train.csv");
    fs::write(&training, "FlightCode,IATACode\nB737-800,738\nA320-214\n").unwrap();
    let evaluation = write_csv(&dir, "test.csv", &fleet());

    assert!(matches!(
        Experiment::run(&config(training, evaluation), &mut MemorySink::new()),
        Err(FlightCodeError::Format(_))
    ));
}

#[test]
fn test_degenerate_files() {
    let dir = TempDir::new().unwrap();
    let empty = write_csv(&dir, "empty.csv", &[]);
    let full = write_csv(&dir, "fleet.csv", &fleet());

    assert!(matches!(
        Experiment::run(&config(empty.clone(), full.clone()), &mut MemorySink::new()),
        Err(FlightCodeError::DegenerateDataset(_))
    ));
    assert!(matches!(
        Experiment::run(&config(full, empty), &mut MemorySink::new()),
        Err(FlightCodeError::DegenerateDataset(_))
    ));
}

#[test]
fn test_missing_evaluation_file() {
    let dir = TempDir::new().unwrap();
    let training = write_csv(&dir, "train.csv", &fleet());

    assert!(matches!(
        Experiment::run(
            &config(training, dir.path().join("missing.csv")),
            &mut MemorySink::new()
        ),
        Err(FlightCodeError::Io(_))
    ));
}

#[test]
fn test_samples_follow_cadence() -> Result<()> {
    let records: Vec<Record> = fleet().into_iter().map(Record::from).collect();
    let model = Trainer::new(PipelineKind::CharTrigram).train(&records)?;

    // 8 correct, then 8 with a wrong expected label
    let mut test_set = records.clone();
    test_set.extend(records.iter().map(|r| Record::new(r.code.clone(), "320")));

    let mut sink = MemorySink::new();
    let report = Evaluator::new()
        .with_sampling(SamplingPolicy {
            correct_every: 3,
            incorrect_every: 4,
        })
        .evaluate(&model, &test_set, &mut sink)?;

    // the two A320 rows of the second half are still correct
    assert_eq!(report.correct, 10);
    assert_eq!(report.incorrect, 6);

    let counts: Vec<(bool, usize)> = sink
        .samples()
        .iter()
        .map(|s| (s.expected == s.predicted, s.count))
        .collect();
    assert_eq!(counts, vec![(true, 3), (true, 6), (true, 9), (false, 4)]);

    Ok(())
}

#[test]
fn test_json_report() -> Result<()> {
    let records: Vec<Record> = fleet().into_iter().map(Record::from).collect();
    let mut sink = JsonSink::new(Vec::new());
    Experiment::run_records(&ExperimentConfig::default(), &records, &records, &mut sink)?;

    let value: serde_json::Value = serde_json::from_slice(&sink.into_inner())?;
    let results = value["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["evaluation"]["variant"], "whole-string");
    assert_eq!(results[1]["evaluation"]["correct"], 8);

    Ok(())
}

#[test]
fn test_training_events_carry_timing() -> Result<()> {
    let records: Vec<Record> = fleet().into_iter().map(Record::from).collect();
    let mut sink = MemorySink::new();
    Experiment::run_records(&ExperimentConfig::default(), &records, &records, &mut sink)?;

    let summaries: Vec<_> = sink
        .events()
        .iter()
        .filter_map(|e| match e {
            ReportEvent::TrainingFinished(summary) => Some(summary),
            _ => None,
        })
        .collect();
    assert_eq!(summaries.len(), 2);
    for summary in summaries {
        assert_eq!(summary.records, 8);
        assert_eq!(summary.classes, 4);
        assert!(summary.elapsed_secs() >= 0.0);
    }

    Ok(())
}
