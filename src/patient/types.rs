use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::validation::InputError;
use crate::scoring::RiskFactor;

/// Femoral neck BMD value meaning "not measured".
pub const BMD_NOT_PROVIDED: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Sex {
    #[default]
    Female,
    Male,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Female => "Female",
            Sex::Male => "Male",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "female" | "f" => Ok(Sex::Female),
            "male" | "m" => Ok(Sex::Male),
            _ => Err(InputError::InvalidSex(s.trim().to_string())),
        }
    }
}

/// One patient's risk-factor inputs, built fresh for every evaluation.
///
/// Field domains are enforced by [`PatientInput::validate`]; the scoring
/// engine assumes they already hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientInput {
    pub age: u32,
    pub sex: Sex,
    pub weight_kg: f64,
    pub height_cm: f64,
    /// g/cm², or [`BMD_NOT_PROVIDED`]
    pub femoral_neck_bmd: f64,
    pub prior_fracture: bool,
    pub parent_hip_fracture: bool,
    pub current_smoker: bool,
    pub glucocorticoids: bool,
    pub rheumatoid_arthritis: bool,
    pub secondary_osteoporosis: bool,
    pub alcohol_3_or_more_per_day: bool,
    pub fall_in_last_year: bool,
    pub immobility: bool,
}

impl Default for PatientInput {
    fn default() -> Self {
        Self {
            age: 65,
            sex: Sex::Female,
            weight_kg: 70.0,
            height_cm: 160.0,
            femoral_neck_bmd: BMD_NOT_PROVIDED,
            prior_fracture: false,
            parent_hip_fracture: false,
            current_smoker: false,
            glucocorticoids: false,
            rheumatoid_arthritis: false,
            secondary_osteoporosis: false,
            alcohol_3_or_more_per_day: false,
            fall_in_last_year: false,
            immobility: false,
        }
    }
}

impl PatientInput {
    /// Body mass index rounded to one decimal place.
    ///
    /// The rounded value is what gets displayed, exported and fed into the
    /// linear predictor.
    pub fn bmi(&self) -> f64 {
        round_to_tenth(self.unrounded_bmi())
    }

    pub fn unrounded_bmi(&self) -> f64 {
        let height_m = self.height_cm / 100.0;
        self.weight_kg / height_m.powi(2)
    }

    pub fn has_bmd(&self) -> bool {
        self.femoral_neck_bmd > BMD_NOT_PROVIDED
    }

    pub fn has(&self, factor: RiskFactor) -> bool {
        match factor {
            RiskFactor::PriorFracture => self.prior_fracture,
            RiskFactor::ParentHipFracture => self.parent_hip_fracture,
            RiskFactor::CurrentSmoker => self.current_smoker,
            RiskFactor::Glucocorticoids => self.glucocorticoids,
            RiskFactor::RheumatoidArthritis => self.rheumatoid_arthritis,
            RiskFactor::SecondaryOsteoporosis => self.secondary_osteoporosis,
            RiskFactor::Alcohol => self.alcohol_3_or_more_per_day,
            RiskFactor::Fall => self.fall_in_last_year,
            RiskFactor::Immobility => self.immobility,
        }
    }

    pub fn set(&mut self, factor: RiskFactor, present: bool) {
        let slot = match factor {
            RiskFactor::PriorFracture => &mut self.prior_fracture,
            RiskFactor::ParentHipFracture => &mut self.parent_hip_fracture,
            RiskFactor::CurrentSmoker => &mut self.current_smoker,
            RiskFactor::Glucocorticoids => &mut self.glucocorticoids,
            RiskFactor::RheumatoidArthritis => &mut self.rheumatoid_arthritis,
            RiskFactor::SecondaryOsteoporosis => &mut self.secondary_osteoporosis,
            RiskFactor::Alcohol => &mut self.alcohol_3_or_more_per_day,
            RiskFactor::Fall => &mut self.fall_in_last_year,
            RiskFactor::Immobility => &mut self.immobility,
        };
        *slot = present;
    }

    /// Risk factors that are present, in scoring order.
    pub fn present_factors(&self) -> Vec<RiskFactor> {
        RiskFactor::ALL
            .iter()
            .copied()
            .filter(|f| self.has(*f))
            .collect()
    }
}

/// Round to one decimal place, ties to even on the exact binary value.
///
/// Goes through the float formatter, which rounds the exact decimal
/// expansion instead of the lossy `x * 10.0`.
pub fn round_to_tenth(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.1}", value).parse().unwrap_or(value)
}
