//! Output formatting for CLI commands.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table};
use serde::{Deserialize, Serialize};

use crate::cli::args::OutputFormat;
use crate::error::Result;
use crate::ml::predictor::Prediction;
use crate::report::ColorMode;

/// Score of one class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f32,
}

/// Result structure for a labelled code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodePrediction {
    pub code: String,
    pub label: String,
    pub confidence: f32,
    /// Every class, best first
    pub scores: Vec<LabelScore>,
}

impl CodePrediction {
    /// Pair a prediction with its code and the label of every score.
    pub fn new(code: &str, prediction: Prediction, labels: &[String]) -> Self {
        let confidence = prediction.confidence();
        let mut scores: Vec<LabelScore> = labels
            .iter()
            .zip(&prediction.scores)
            .map(|(label, &score)| LabelScore {
                label: label.clone(),
                score,
            })
            .collect();
        scores.sort_by(|a, b| b.score.total_cmp(&a.score));

        CodePrediction {
            code: code.to_string(),
            label: prediction.label,
            confidence,
            scores,
        }
    }

    /// The best `n` scores that are not the predicted label.
    pub fn runners_up(&self, n: usize) -> impl Iterator<Item = &LabelScore> {
        self.scores
            .iter()
            .filter(move |s| s.label != self.label)
            .take(n)
    }
}

/// Output predictions in the specified format.
pub fn output_predictions(
    predictions: &[CodePrediction],
    format: OutputFormat,
    color: ColorMode,
) -> Result<()> {
    match format {
        OutputFormat::Human => {
            println!("{}", predictions_table(predictions, color));
            Ok(())
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(predictions)?);
            Ok(())
        }
    }
}

/// Render predictions as a table.
pub fn predictions_table(predictions: &[CodePrediction], color: ColorMode) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS);
    match color {
        ColorMode::Auto => {}
        ColorMode::Always => {
            table.enforce_styling();
        }
        ColorMode::Never => {
            table.force_no_tty();
        }
    }

    table.set_header(vec![
        header_cell("Code"),
        header_cell("Label"),
        header_cell("Confidence"),
        header_cell("Runner-up"),
    ]);
    for prediction in predictions {
        let runner_up = prediction
            .runners_up(1)
            .map(|s| format!("{} ({:.4})", s.label, s.score))
            .next()
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(&prediction.code),
            Cell::new(&prediction.label)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
            Cell::new(format!("{:.4}", prediction.confidence)),
            Cell::new(runner_up).fg(Color::DarkGrey),
        ]);
    }
    if let Some(column) = table.column_mut(2) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    table
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction() -> CodePrediction {
        CodePrediction::new(
            "B737",
            Prediction {
                label: "738".to_string(),
                scores: vec![0.7, 0.1, 0.2],
            },
            &["738".to_string(), "320".to_string(), "E90".to_string()],
        )
    }

    #[test]
    fn test_scores_best_first() {
        let p = prediction();
        assert_eq!(p.confidence, 0.7);
        let labels: Vec<&str> = p.scores.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["738", "E90", "320"]);
        assert_eq!(p.runners_up(1).next().map(|s| s.label.as_str()), Some("E90"));
    }

    #[test]
    fn test_table_lists_codes() {
        let rendered = predictions_table(&[prediction()], ColorMode::Never).to_string();
        assert!(rendered.contains("B737"));
        assert!(rendered.contains("E90 (0.2000)"));
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(vec![prediction()]).unwrap();
        assert_eq!(json[0]["label"], "738");
        assert_eq!(json[0]["scores"].as_array().unwrap().len(), 3);
    }
}
