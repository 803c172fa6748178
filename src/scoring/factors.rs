use serde::{Deserialize, Serialize};
use std::fmt;

/// Yes/no clinical risk factors, in the order they enter the linear predictor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    PriorFracture,
    ParentHipFracture,
    CurrentSmoker,
    Glucocorticoids,
    RheumatoidArthritis,
    SecondaryOsteoporosis,
    #[serde(rename = "alcohol_3_or_more_per_day")]
    Alcohol,
    #[serde(rename = "fall_in_last_year")]
    Fall,
    Immobility,
}

impl RiskFactor {
    pub const ALL: [RiskFactor; 9] = [
        RiskFactor::PriorFracture,
        RiskFactor::ParentHipFracture,
        RiskFactor::CurrentSmoker,
        RiskFactor::Glucocorticoids,
        RiskFactor::RheumatoidArthritis,
        RiskFactor::SecondaryOsteoporosis,
        RiskFactor::Alcohol,
        RiskFactor::Fall,
        RiskFactor::Immobility,
    ];

    /// Config key, identical to the matching `PatientInput` field name.
    pub fn key(&self) -> &'static str {
        match self {
            RiskFactor::PriorFracture => "prior_fracture",
            RiskFactor::ParentHipFracture => "parent_hip_fracture",
            RiskFactor::CurrentSmoker => "current_smoker",
            RiskFactor::Glucocorticoids => "glucocorticoids",
            RiskFactor::RheumatoidArthritis => "rheumatoid_arthritis",
            RiskFactor::SecondaryOsteoporosis => "secondary_osteoporosis",
            RiskFactor::Alcohol => "alcohol_3_or_more_per_day",
            RiskFactor::Fall => "fall_in_last_year",
            RiskFactor::Immobility => "immobility",
        }
    }

    /// Question wording shown on the form.
    pub fn label(&self) -> &'static str {
        match self {
            RiskFactor::PriorFracture => "Prior fragility fracture",
            RiskFactor::ParentHipFracture => "Parental hip fracture",
            RiskFactor::CurrentSmoker => "Current smoker",
            RiskFactor::Glucocorticoids => "Long-term systemic glucocorticoids",
            RiskFactor::RheumatoidArthritis => "Rheumatoid arthritis",
            RiskFactor::SecondaryOsteoporosis => "Secondary causes of osteoporosis",
            RiskFactor::Alcohol => "Alcohol >= 3 units/day",
            RiskFactor::Fall => "One or more falls in last year",
            RiskFactor::Immobility => "Prolonged immobility / wheelchair-bound",
        }
    }

    pub fn default_weight(&self) -> f64 {
        match self {
            RiskFactor::PriorFracture => 1.2,
            RiskFactor::ParentHipFracture => 0.7,
            RiskFactor::CurrentSmoker => 0.6,
            RiskFactor::Glucocorticoids => 0.9,
            RiskFactor::RheumatoidArthritis => 0.8,
            RiskFactor::SecondaryOsteoporosis => 0.9,
            RiskFactor::Alcohol => 0.5,
            RiskFactor::Fall => 0.8,
            RiskFactor::Immobility => 1.0,
        }
    }
}

impl fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lower bounds (inclusive) of the Mild, Moderate and High bands.
/// Anything below `mild` is Low.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandThresholds {
    pub mild: f64,
    pub moderate: f64,
    pub high: f64,
}

impl Default for BandThresholds {
    fn default() -> Self {
        Self {
            mild: 10.0,
            moderate: 20.0,
            high: 35.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interpretation {
    Low,
    Mild,
    Moderate,
    High,
}

impl Interpretation {
    /// Half-open bands checked from the bottom up; first match wins.
    pub fn classify(screening_index: f64, bands: &BandThresholds) -> Self {
        if screening_index < bands.mild {
            Interpretation::Low
        } else if screening_index < bands.moderate {
            Interpretation::Mild
        } else if screening_index < bands.high {
            Interpretation::Moderate
        } else {
            Interpretation::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Interpretation::Low => "Low (screening only).",
            Interpretation::Mild => "Mild (consider bone densitometry if other concerns).",
            Interpretation::Moderate => {
                "Moderate (consider referral for further assessment / DXA)."
            }
            Interpretation::High => "High (refer for DXA and specialist assessment).",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Interpretation::Low => "Low",
            Interpretation::Mild => "Mild",
            Interpretation::Moderate => "Moderate",
            Interpretation::High => "High",
        }
    }
}

impl fmt::Display for Interpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(index: f64) -> Interpretation {
        Interpretation::classify(index, &BandThresholds::default())
    }

    #[test]
    fn test_band_lower_bounds_inclusive() {
        assert_eq!(classify(10.0), Interpretation::Mild);
        assert_eq!(classify(20.0), Interpretation::Moderate);
        assert_eq!(classify(35.0), Interpretation::High);
    }

    #[test]
    fn test_band_just_below_bounds() {
        assert_eq!(classify(9.9), Interpretation::Low);
        assert_eq!(classify(19.9), Interpretation::Mild);
        assert_eq!(classify(34.9), Interpretation::Moderate);
    }

    #[test]
    fn test_band_extremes() {
        assert_eq!(classify(0.0), Interpretation::Low);
        assert_eq!(classify(100.0), Interpretation::High);
    }

    #[test]
    fn test_band_labels() {
        assert_eq!(Interpretation::Low.label(), "Low (screening only).");
        assert_eq!(
            Interpretation::Mild.label(),
            "Mild (consider bone densitometry if other concerns)."
        );
        assert_eq!(
            Interpretation::Moderate.label(),
            "Moderate (consider referral for further assessment / DXA)."
        );
        assert_eq!(
            Interpretation::High.label(),
            "High (refer for DXA and specialist assessment)."
        );
    }

    #[test]
    fn test_custom_thresholds() {
        let bands = BandThresholds {
            mild: 5.0,
            moderate: 15.0,
            high: 25.0,
        };
        assert_eq!(Interpretation::classify(5.0, &bands), Interpretation::Mild);
        assert_eq!(Interpretation::classify(24.9, &bands), Interpretation::Moderate);
    }

    #[test]
    fn test_factor_keys_unique_and_ordered() {
        let keys: Vec<&str> = RiskFactor::ALL.iter().map(|f| f.key()).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), RiskFactor::ALL.len());
        assert_eq!(keys[0], "prior_fracture");
        assert_eq!(keys[8], "immobility");
    }

    #[test]
    fn test_factor_serde_key_matches_key() {
        for factor in RiskFactor::ALL {
            let json = serde_json::to_string(&factor).unwrap();
            assert_eq!(json, format!("\"{}\"", factor.key()));
        }
    }
}
