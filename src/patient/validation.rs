use thiserror::Error;

use super::types::{PatientInput, BMD_NOT_PROVIDED};

pub const AGE_RANGE: (u32, u32) = (40, 100);
pub const WEIGHT_RANGE: (f64, f64) = (30.0, 200.0);
pub const HEIGHT_RANGE: (f64, f64) = (120.0, 220.0);
pub const BMD_RANGE: (f64, f64) = (0.4, 1.6);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("{field}: {value} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("femoral_neck_bmd: {0} must be 0 (not provided) or within {min}..={max}", min = BMD_RANGE.0, max = BMD_RANGE.1)]
    InvalidBmd(f64),

    #[error("sex: '{0}' is not one of Female, Male")]
    InvalidSex(String),
}

fn check_range(
    errors: &mut Vec<InputError>,
    field: &'static str,
    value: f64,
    (min, max): (f64, f64),
) {
    // NaN fails both comparisons, so test for containment rather than exclusion
    if !(value >= min && value <= max) {
        errors.push(InputError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
}

impl PatientInput {
    /// Check every field against its domain.
    /// Returns all violations at once (not just the first).
    pub fn validate(&self) -> Result<(), Vec<InputError>> {
        let mut errors = Vec::new();

        check_range(
            &mut errors,
            "age",
            f64::from(self.age),
            (f64::from(AGE_RANGE.0), f64::from(AGE_RANGE.1)),
        );
        check_range(&mut errors, "weight_kg", self.weight_kg, WEIGHT_RANGE);
        check_range(&mut errors, "height_cm", self.height_cm, HEIGHT_RANGE);

        let bmd = self.femoral_neck_bmd;
        if bmd != BMD_NOT_PROVIDED && !(bmd >= BMD_RANGE.0 && bmd <= BMD_RANGE.1) {
            errors.push(InputError::InvalidBmd(bmd));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_input_is_valid() {
        assert!(PatientInput::default().validate().is_ok());
    }

    #[test]
    fn test_domain_edges_are_valid() {
        let low = PatientInput {
            age: 40,
            weight_kg: 30.0,
            height_cm: 120.0,
            femoral_neck_bmd: 0.4,
            ..PatientInput::default()
        };
        let high = PatientInput {
            age: 100,
            weight_kg: 200.0,
            height_cm: 220.0,
            femoral_neck_bmd: 1.6,
            ..PatientInput::default()
        };
        assert!(low.validate().is_ok());
        assert!(high.validate().is_ok());
    }

    #[test]
    fn test_age_out_of_range() {
        let input = PatientInput {
            age: 39,
            ..PatientInput::default()
        };
        let errors = input.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().starts_with("age:"));
    }

    #[test]
    fn test_negative_weight() {
        let input = PatientInput {
            weight_kg: -5.0,
            ..PatientInput::default()
        };
        let errors = input.validate().unwrap_err();
        assert!(matches!(
            errors[0],
            InputError::OutOfRange { field: "weight_kg", .. }
        ));
    }

    #[test]
    fn test_nan_height_rejected() {
        let input = PatientInput {
            height_cm: f64::NAN,
            ..PatientInput::default()
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_bmd_between_sentinel_and_range_rejected() {
        let input = PatientInput {
            femoral_neck_bmd: 0.2,
            ..PatientInput::default()
        };
        let errors = input.validate().unwrap_err();
        assert_eq!(errors, vec![InputError::InvalidBmd(0.2)]);
    }

    #[test]
    fn test_collects_all_errors() {
        let input = PatientInput {
            age: 120,          // Error 1
            weight_kg: 10.0,   // Error 2
            height_cm: 300.0,  // Error 3
            femoral_neck_bmd: 2.0, // Error 4
            ..PatientInput::default()
        };
        let errors = input.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
    }
}
