use serde::Serialize;

use super::config::ScreeningModel;
use super::factors::Interpretation;
use crate::patient::{round_to_tenth, PatientInput, Sex};

#[derive(Debug, Clone, Serialize)]
pub struct TermContribution {
    pub label: String,       // e.g. "Age", "BMI", "Prior fragility fracture"
    pub description: String, // e.g. "0.12 x (65 - 40)"
    pub before: f64,         // Predictor before this term
    pub after: f64,          // Predictor after this term
}

impl TermContribution {
    pub fn delta(&self) -> f64 {
        self.after - self.before
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreBreakdown {
    pub baseline: f64,
    pub terms: Vec<TermContribution>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScreeningResult {
    pub bmi: f64,
    pub linear_predictor: f64,
    pub screening_index: f64,
    pub interpretation: Interpretation,
    #[serde(skip)]
    pub breakdown: ScoreBreakdown,
}

/// Score one patient.
///
/// Inputs must already be inside their domains (see `PatientInput::validate`).
pub fn compute_screening(input: &PatientInput, model: &ScreeningModel) -> ScreeningResult {
    let bmi = input.bmi();
    let (linear_predictor, breakdown) = linear_predictor(input, bmi, model);
    let screening_index = to_screening_index(linear_predictor);
    let interpretation = Interpretation::classify(screening_index, &model.bands);

    log::debug!(
        "predictor={} index={} band={}",
        linear_predictor,
        screening_index,
        interpretation.name()
    );

    ScreeningResult {
        bmi,
        linear_predictor,
        screening_index,
        interpretation,
        breakdown,
    }
}

/// Weighted sum of risk factors, evaluated with the given BMI.
///
/// Terms are accumulated in a fixed order with no intermediate rounding, so
/// the sum is reproducible to the bit.
pub fn linear_predictor(
    input: &PatientInput,
    bmi: f64,
    model: &ScreeningModel,
) -> (f64, ScoreBreakdown) {
    let mut score = model.baseline;
    let mut terms = Vec::new();

    let mut push = |score: &mut f64, label: &str, description: String, value: f64| {
        let before = *score;
        *score += value;
        log::debug!("{}: {} -> {:+}", label, description, value);
        terms.push(TermContribution {
            label: label.to_string(),
            description,
            before,
            after: *score,
        });
    };

    let age = f64::from(input.age);
    push(
        &mut score,
        "Age",
        format!("{} x ({} - {})", model.age_weight, age, model.age_reference),
        model.age_weight * (age - model.age_reference),
    );

    if input.sex == Sex::Male {
        push(
            &mut score,
            "Sex",
            "Male".to_string(),
            model.male_weight,
        );
    }

    push(
        &mut score,
        "BMI",
        format!("{} x ({} - {})", model.bmi_weight, bmi, model.bmi_reference),
        model.bmi_weight * (bmi - model.bmi_reference),
    );

    for factor in input.present_factors() {
        push(
            &mut score,
            factor.label(),
            "present".to_string(),
            model.factor_weight(factor),
        );
    }

    // 0.0 means BMD was not measured and contributes nothing
    if input.has_bmd() {
        let bmd = input.femoral_neck_bmd;
        push(
            &mut score,
            "Femoral neck BMD",
            format!("{} x ({} - {})", model.bmd_weight, bmd, model.bmd_reference),
            model.bmd_weight * (bmd - model.bmd_reference),
        );
    }

    (
        score,
        ScoreBreakdown {
            baseline: model.baseline,
            terms,
        },
    )
}

pub fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Logistic transform scaled to 0..=100, rounded to one decimal place.
pub fn to_screening_index(linear_predictor: f64) -> f64 {
    round_to_tenth(logistic(linear_predictor) * 100.0)
}
