use std::io::IsTerminal;
use owo_colors::OwoColorize;
use serde::Serialize;
use terminal_size::{Width, terminal_size};

use crate::export::{format_real, ScreeningRecord, COLUMNS};
use crate::patient::PatientInput;
use crate::scoring::{Interpretation, RiskFactor, ScreeningModel, ScreeningResult};

pub const TITLE: &str = "Fracture Risk Calculator - Screening Tool";

pub const INTRO: &str = "This tool provides an approximate screening score for fracture risk based on \
common clinical risk factors. It is not a substitute for validated calculators such as FRAX \
(University of Sheffield).";

pub const ABOUT: [&str; 3] = [
    "The score produced is a heuristic screening index and not a validated 10-year probability.",
    "For treatment decisions and formal 10-year fracture probabilities, use established tools such as FRAX.",
    "You may adapt the model weights in the config file for local validation studies.",
];

pub const NOTE: &str = "Note: This index is indicative and intended for screening only. For a \
validated 10-year fracture probability use FRAX or local validated tools.";

pub const REFERENCES: [&str; 2] = [
    "This tool is a screening demonstration only and not for clinical diagnosis.",
    "For validated 10-year fracture probability calculators see FRAX (University of Sheffield).",
];

const MAX_RULE_WIDTH: usize = 72;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Horizontal separator sized to the terminal, capped for readability
pub fn rule() -> String {
    let width = terminal_size()
        .map(|(Width(w), _)| w as usize)
        .unwrap_or(MAX_RULE_WIDTH)
        .min(MAX_RULE_WIDTH);
    "-".repeat(width)
}

/// "4.2 / 100"
pub fn format_index(screening_index: f64) -> String {
    format!("{} / 100", format_real(screening_index))
}

fn colorize_interpretation(interpretation: Interpretation) -> String {
    let label = interpretation.label();
    match interpretation {
        Interpretation::Low => label.green().to_string(),
        Interpretation::Mild => label.yellow().to_string(),
        Interpretation::Moderate => label.bright_yellow().bold().to_string(),
        Interpretation::High => label.red().bold().to_string(),
    }
}

/// Intro and about/disclaimer copy shown before the form
pub fn format_banner(use_colors: bool) -> String {
    let title = if use_colors {
        TITLE.bold().to_string()
    } else {
        TITLE.to_string()
    };
    let about = ABOUT
        .iter()
        .map(|line| format!("  - {}", line))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{}\n\n{}\n\nAbout / Disclaimer:\n{}", title, INTRO, about)
}

/// Human-readable result block: BMI, index, interpretation and the fixed note
pub fn format_result(result: &ScreeningResult, use_colors: bool) -> String {
    let index = format_index(result.screening_index);
    let (heading, index, interpretation) = if use_colors {
        (
            "Results".bold().to_string(),
            index.bold().to_string(),
            colorize_interpretation(result.interpretation),
        )
    } else {
        (
            "Results".to_string(),
            index,
            result.interpretation.label().to_string(),
        )
    };

    let references = REFERENCES
        .iter()
        .map(|line| format!("  - {}", line))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{}\n  Body Mass Index (BMI): {}\n  Screening index (approximate): {}\n  {}\n\n{}\n\n{}\nReferences and notes:\n{}",
        heading,
        format_real(result.bmi),
        index,
        interpretation,
        NOTE,
        rule(),
        references
    )
}

/// Per-term contributions to the linear predictor
pub fn format_breakdown(result: &ScreeningResult) -> String {
    let label_width = result
        .breakdown
        .terms
        .iter()
        .map(|t| t.label.chars().count())
        .max()
        .unwrap_or(0)
        .max("Baseline".len());

    let mut lines = vec![format!(
        "  {:<width$}  {:>+8.3}",
        "Baseline",
        result.breakdown.baseline,
        width = label_width
    )];
    for term in &result.breakdown.terms {
        lines.push(format!(
            "  {:<width$}  {:>+8.3}  {}",
            term.label,
            term.delta(),
            term.description,
            width = label_width
        ));
    }
    lines.push(format!(
        "  {:<width$}  {:>+8.3}",
        "Linear predictor",
        result.linear_predictor,
        width = label_width
    ));
    format!("Score breakdown:\n{}", lines.join("\n"))
}

/// The exported record as an aligned two-line table
pub fn format_record_table(record: &ScreeningRecord) -> String {
    let values = record.values();
    let widths: Vec<usize> = COLUMNS
        .iter()
        .zip(values.iter())
        .map(|(c, v)| c.chars().count().max(v.chars().count()))
        .collect();

    let header = COLUMNS
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!("{:<w$}", c, w = *w))
        .collect::<Vec<_>>()
        .join("  ");
    let row = values
        .iter()
        .zip(&widths)
        .map(|(v, w)| format!("{:<w$}", v, w = *w))
        .collect::<Vec<_>>()
        .join("  ");
    format!("{}\n{}", header.trim_end(), row.trim_end())
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    input: &'a PatientInput,
    bmi: f64,
    linear_predictor: f64,
    screening_index: f64,
    interpretation: &'a str,
    band: &'a str,
}

/// Machine-readable result for scripting
pub fn format_json(input: &PatientInput, result: &ScreeningResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonOutput {
        input,
        bmi: result.bmi,
        linear_predictor: result.linear_predictor,
        screening_index: result.screening_index,
        interpretation: result.interpretation.label(),
        band: result.interpretation.name(),
    })
}

/// Effective weights and band thresholds
pub fn format_model(model: &ScreeningModel) -> String {
    let mut lines = vec![
        format!("Baseline:            {}", model.baseline),
        format!("Age:                 {} per year above {}", model.age_weight, model.age_reference),
        format!("Male:                {:+}", model.male_weight),
        format!("BMI:                 {} x (bmi - {})", model.bmi_weight, model.bmi_reference),
        format!(
            "Femoral neck BMD:    {} x (bmd - {}), only when measured",
            model.bmd_weight, model.bmd_reference
        ),
        String::new(),
        "Risk factors:".to_string(),
    ];
    for factor in RiskFactor::ALL {
        lines.push(format!(
            "  {:<28} {:+}",
            factor.key(),
            model.factor_weight(factor)
        ));
    }
    lines.push(String::new());
    lines.push("Bands:".to_string());
    lines.push(format!("  Low       < {}", model.bands.mild));
    lines.push(format!("  Mild      < {}", model.bands.moderate));
    lines.push(format!("  Moderate  < {}", model.bands.high));
    lines.push(format!("  High     >= {}", model.bands.high));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::compute_screening;
    use chrono::NaiveDate;

    fn example_result() -> (PatientInput, ScreeningResult) {
        let input = PatientInput::default();
        let result = compute_screening(&input, &ScreeningModel::default());
        (input, result)
    }

    #[test]
    fn test_format_index() {
        assert_eq!(format_index(4.2), "4.2 / 100");
        assert_eq!(format_index(50.0), "50.0 / 100");
    }

    #[test]
    fn test_format_result_plain() {
        let (_, result) = example_result();
        let text = format_result(&result, false);
        assert!(text.contains("Body Mass Index (BMI): 27.3"));
        assert!(text.contains("Screening index (approximate): 4.2 / 100"));
        assert!(text.contains("Low (screening only)."));
        assert!(text.contains(NOTE));
        assert!(text.contains("FRAX (University of Sheffield)"));
    }

    #[test]
    fn test_format_result_colored_keeps_text() {
        let (_, result) = example_result();
        let text = format_result(&result, true);
        assert!(text.contains("Low (screening only)."));
    }

    #[test]
    fn test_format_breakdown() {
        let (mut input, _) = example_result();
        input.prior_fracture = true;
        let result = compute_screening(&input, &ScreeningModel::default());
        let text = format_breakdown(&result);
        assert!(text.starts_with("Score breakdown:"));
        assert!(text.contains("Baseline"));
        assert!(text.contains("-6.000"));
        assert!(text.contains("Prior fragility fracture"));
        assert!(text.contains("+1.200"));
        assert!(text.contains("Linear predictor"));
    }

    #[test]
    fn test_format_record_table() {
        let (input, result) = example_result();
        let record =
            ScreeningRecord::new(&input, &result, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        let table = format_record_table(&record);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("date"));
        assert!(lines[0].ends_with("interpretation"));
        assert!(lines[1].starts_with("2026-10-19"));
        assert!(lines[1].ends_with("Low (screening only)."));
    }

    #[test]
    fn test_format_json() {
        let (input, result) = example_result();
        let json = format_json(&input, &result).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["screening_index"], 4.2);
        assert_eq!(value["bmi"], 27.3);
        assert_eq!(value["band"], "Low");
        assert_eq!(value["interpretation"], "Low (screening only).");
        assert_eq!(value["input"]["sex"], "Female");
        assert_eq!(value["input"]["age"], 65);
    }

    #[test]
    fn test_format_model_lists_all_factors() {
        let text = format_model(&ScreeningModel::default());
        for factor in RiskFactor::ALL {
            assert!(text.contains(factor.key()));
        }
        assert!(text.contains("High     >= 35"));
    }

    #[test]
    fn test_format_banner() {
        let text = format_banner(false);
        assert!(text.starts_with(TITLE));
        assert!(text.contains("not a validated 10-year probability"));
    }

    #[test]
    fn test_rule_capped() {
        assert!(rule().len() <= MAX_RULE_WIDTH);
    }
}
