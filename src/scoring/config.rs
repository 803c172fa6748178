use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::factors::{BandThresholds, RiskFactor};

/// Model recalibration overrides.
///
/// Every field is optional; anything left out keeps the built-in weight.
///
/// Example YAML:
/// ```yaml
/// model:
///   baseline: -6.0
///   age_weight: 0.12
///   factors:
///     prior_fracture: 1.2
///     immobility: 1.0
///   bands:
///     mild: 10
///     moderate: 20
///     high: 35
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// Linear predictor before any term is added (default: -6.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline: Option<f64>,

    /// Added per year of age above `age_reference`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_weight: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_reference: Option<f64>,

    /// Added once when sex is Male
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub male_weight: Option<f64>,

    /// Multiplies (bmi - bmi_reference); negative because higher BMI is mildly protective
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmi_weight: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmi_reference: Option<f64>,

    /// Multiplies (bmd - bmd_reference), only when BMD was measured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmd_weight: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmd_reference: Option<f64>,

    /// Per-factor weight overrides keyed by input field name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factors: Option<BTreeMap<RiskFactor, f64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bands: Option<BandConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BandConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mild: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moderate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
}

/// Fully resolved weights the engine evaluates with.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreeningModel {
    pub baseline: f64,
    pub age_weight: f64,
    pub age_reference: f64,
    pub male_weight: f64,
    pub bmi_weight: f64,
    pub bmi_reference: f64,
    pub bmd_weight: f64,
    pub bmd_reference: f64,
    pub factors: BTreeMap<RiskFactor, f64>,
    pub bands: BandThresholds,
}

impl Default for ScreeningModel {
    fn default() -> Self {
        Self {
            baseline: -6.0,
            age_weight: 0.12,
            age_reference: 40.0,
            male_weight: -0.10,
            bmi_weight: -0.05,
            bmi_reference: 25.0,
            bmd_weight: -2.5,
            bmd_reference: 0.7,
            factors: RiskFactor::ALL
                .iter()
                .map(|f| (*f, f.default_weight()))
                .collect(),
            bands: BandThresholds::default(),
        }
    }
}

impl ScreeningModel {
    /// Resolve config overrides over the built-in model.
    pub fn from_config(config: &ModelConfig) -> Self {
        let defaults = Self::default();

        let mut factors = defaults.factors;
        if let Some(ref overrides) = config.factors {
            for (factor, weight) in overrides {
                factors.insert(*factor, *weight);
            }
        }

        let bands = match config.bands {
            Some(ref b) => BandThresholds {
                mild: b.mild.unwrap_or(defaults.bands.mild),
                moderate: b.moderate.unwrap_or(defaults.bands.moderate),
                high: b.high.unwrap_or(defaults.bands.high),
            },
            None => defaults.bands,
        };

        Self {
            baseline: config.baseline.unwrap_or(defaults.baseline),
            age_weight: config.age_weight.unwrap_or(defaults.age_weight),
            age_reference: config.age_reference.unwrap_or(defaults.age_reference),
            male_weight: config.male_weight.unwrap_or(defaults.male_weight),
            bmi_weight: config.bmi_weight.unwrap_or(defaults.bmi_weight),
            bmi_reference: config.bmi_reference.unwrap_or(defaults.bmi_reference),
            bmd_weight: config.bmd_weight.unwrap_or(defaults.bmd_weight),
            bmd_reference: config.bmd_reference.unwrap_or(defaults.bmd_reference),
            factors,
            bands,
        }
    }

    /// Weight for a yes/no factor. Missing entries count as zero.
    pub fn factor_weight(&self, factor: RiskFactor) -> f64 {
        self.factors.get(&factor).copied().unwrap_or(0.0)
    }

    /// Config that spells out every built-in weight, for `init`.
    pub fn to_config(&self) -> ModelConfig {
        ModelConfig {
            baseline: Some(self.baseline),
            age_weight: Some(self.age_weight),
            age_reference: Some(self.age_reference),
            male_weight: Some(self.male_weight),
            bmi_weight: Some(self.bmi_weight),
            bmi_reference: Some(self.bmi_reference),
            bmd_weight: Some(self.bmd_weight),
            bmd_reference: Some(self.bmd_reference),
            factors: Some(self.factors.clone()),
            bands: Some(BandConfig {
                mild: Some(self.bands.mild),
                moderate: Some(self.bands.moderate),
                high: Some(self.bands.high),
            }),
        }
    }
}
