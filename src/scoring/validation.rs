use super::config::{ModelConfig, ScreeningModel};

/// Validate model overrides at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_model(config: &ModelConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let scalars = [
        ("baseline", config.baseline),
        ("age_weight", config.age_weight),
        ("age_reference", config.age_reference),
        ("male_weight", config.male_weight),
        ("bmi_weight", config.bmi_weight),
        ("bmi_reference", config.bmi_reference),
        ("bmd_weight", config.bmd_weight),
        ("bmd_reference", config.bmd_reference),
    ];
    for (name, value) in scalars {
        if let Some(v) = value {
            if !v.is_finite() {
                errors.push(format!("model.{}: must be a finite number", name));
            }
        }
    }

    if let Some(ref factors) = config.factors {
        for (factor, weight) in factors {
            if !weight.is_finite() {
                errors.push(format!(
                    "model.factors.{}: must be a finite number",
                    factor.key()
                ));
            }
        }
    }

    if let Some(ref bands) = config.bands {
        for (name, value) in [
            ("mild", bands.mild),
            ("moderate", bands.moderate),
            ("high", bands.high),
        ] {
            if let Some(v) = value {
                if !(v > 0.0 && v <= 100.0) {
                    errors.push(format!("model.bands.{}: must be within (0, 100]", name));
                }
            }
        }

        // Ordering is checked on the resolved thresholds so a single override
        // can't slip past a default neighbour.
        let resolved = ScreeningModel::from_config(config).bands;
        if !(resolved.mild < resolved.moderate && resolved.moderate < resolved.high) {
            errors.push(format!(
                "model.bands: thresholds must increase (mild {} < moderate {} < high {})",
                resolved.mild, resolved.moderate, resolved.high
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
