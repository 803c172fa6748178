use anyhow::{bail, Context, Result};
use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::export::format_real;
use crate::patient::validation::{AGE_RANGE, BMD_RANGE, HEIGHT_RANGE, WEIGHT_RANGE};
use crate::patient::{PatientInput, Sex, BMD_NOT_PROVIDED};
use crate::scoring::RiskFactor;

/// Line-oriented prompts over any reader/writer pair.
pub struct Prompter<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Prompt user with a message and return their trimmed input.
    pub fn prompt(&mut self, message: &str) -> Result<String> {
        write!(self.writer, "{}", message).context("Failed to write prompt")?;
        self.writer.flush().context("Failed to flush prompt")?;
        let mut input = String::new();
        let read = self
            .reader
            .read_line(&mut input)
            .context("Failed to read input")?;
        if read == 0 {
            bail!("Input ended before the form was complete");
        }
        Ok(input.trim().to_string())
    }

    /// Prompt user with a message and a default value. Returns default if input is empty.
    pub fn prompt_with_default(&mut self, message: &str, default: &str) -> Result<String> {
        let input = self.prompt(&format!("{} [{}]: ", message, default))?;
        if input.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(input)
        }
    }

    /// Prompt user with a yes/no question. Returns bool based on input and default.
    pub fn prompt_yes_no(&mut self, message: &str, default_yes: bool) -> Result<bool> {
        let hint = if default_yes { "Y/n" } else { "y/N" };
        loop {
            let input = self.prompt(&format!("{} [{}]: ", message, hint))?;
            match input.to_lowercase().as_str() {
                "" => return Ok(default_yes),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.say("  Invalid: answer y or n. Try again.")?,
            }
        }
    }

    /// Keep asking until the answer parses and lies within `min..=max`.
    pub fn prompt_in_range<T>(&mut self, message: &str, default: T, min: T, max: T) -> Result<T>
    where
        T: FromStr + PartialOrd + Copy + std::fmt::Display,
    {
        loop {
            let input = self.prompt_with_default(message, &default.to_string())?;
            match input.parse::<T>() {
                Ok(v) if v >= min && v <= max => return Ok(v),
                _ => self.say(&format!(
                    "  Invalid: must be a number between {} and {}. Try again.",
                    min, max
                ))?,
            }
        }
    }

    pub fn say(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{}", line).context("Failed to write output")
    }
}

/// Walk the user through every input field.
///
/// Values outside their domain are refused at entry and asked again, so the
/// returned input always passes `PatientInput::validate`.
pub fn collect_patient<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
) -> Result<PatientInput> {
    let defaults = PatientInput::default();
    let mut input = PatientInput::default();

    prompter.say("Patient information")?;

    input.age = prompter.prompt_in_range("Age (years)", defaults.age, AGE_RANGE.0, AGE_RANGE.1)?;

    input.sex = loop {
        let s = prompter.prompt_with_default("Sex (Female/Male)", defaults.sex.as_str())?;
        match s.parse::<Sex>() {
            Ok(sex) => break sex,
            Err(e) => prompter.say(&format!("  Invalid: {}. Try again.", e))?,
        }
    };

    input.weight_kg = prompter.prompt_in_range(
        "Weight (kg)",
        defaults.weight_kg,
        WEIGHT_RANGE.0,
        WEIGHT_RANGE.1,
    )?;
    input.height_cm = prompter.prompt_in_range(
        "Height (cm)",
        defaults.height_cm,
        HEIGHT_RANGE.0,
        HEIGHT_RANGE.1,
    )?;
    prompter.say(&format!("  Body Mass Index (BMI): {}", format_real(input.bmi())))?;

    input.femoral_neck_bmd = loop {
        let s = prompter.prompt("Femoral neck BMD (g/cm2), optional [blank = not measured]: ")?;
        if s.is_empty() {
            break BMD_NOT_PROVIDED;
        }
        match s.parse::<f64>() {
            Ok(v) if v == BMD_NOT_PROVIDED || (v >= BMD_RANGE.0 && v <= BMD_RANGE.1) => break v,
            _ => prompter.say(&format!(
                "  Invalid: must be blank or between {} and {}. Try again.",
                BMD_RANGE.0, BMD_RANGE.1
            ))?,
        }
    };

    prompter.say("")?;
    prompter.say("Risk factors")?;
    for factor in RiskFactor::ALL {
        let present = prompter.prompt_yes_no(factor.label(), false)?;
        input.set(factor, present);
    }

    log::debug!("Form collected {:?}", input);
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(script: &str) -> (Result<PatientInput>, String) {
        let mut out = Vec::new();
        let result = {
            let mut prompter = Prompter::new(script.as_bytes(), &mut out);
            collect_patient(&mut prompter)
        };
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_all_defaults() {
        // age, sex, weight, height, bmd, then nine risk factors
        let script = "\n".repeat(5 + 9);
        let (result, out) = run(&script);
        let input = result.unwrap();
        assert_eq!(input, PatientInput::default());
        assert!(out.contains("Body Mass Index (BMI): 27.3"));
    }

    #[test]
    fn test_explicit_answers() {
        let script = "72\nm\n80.5\n175\n0.65\ny\nn\nyes\n\n\n\n\n\ny\n";
        let (result, _) = run(script);
        let input = result.unwrap();
        assert_eq!(input.age, 72);
        assert_eq!(input.sex, Sex::Male);
        assert_eq!(input.weight_kg, 80.5);
        assert_eq!(input.height_cm, 175.0);
        assert_eq!(input.femoral_neck_bmd, 0.65);
        assert!(input.prior_fracture);
        assert!(!input.parent_hip_fracture);
        assert!(input.current_smoker);
        assert!(input.immobility);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_reprompts() {
        // age 30 then 101 then 45; weight -5 then abc then 60; bmd 0.2 then blank
        let script = format!("30\n101\n45\n\n-5\nabc\n60\n\n0.2\n\n{}", "\n".repeat(9));
        let (result, out) = run(&script);
        let input = result.unwrap();
        assert_eq!(input.age, 45);
        assert_eq!(input.weight_kg, 60.0);
        assert_eq!(input.femoral_neck_bmd, BMD_NOT_PROVIDED);
        assert_eq!(out.matches("must be a number between 40 and 100").count(), 2);
        assert_eq!(out.matches("must be a number between 30 and 200").count(), 2);
        assert!(out.contains("must be blank or between 0.4 and 1.6"));
    }

    #[test]
    fn test_invalid_sex_reprompts() {
        let script = format!("\nx\nfemale\n\n\n\n{}", "\n".repeat(9));
        let (result, out) = run(&script);
        assert_eq!(result.unwrap().sex, Sex::Female);
        assert!(out.contains("is not one of Female, Male"));
    }

    #[test]
    fn test_truncated_input_is_error() {
        let (result, _) = run("65\n");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Input ended"));
    }

    #[test]
    fn test_yes_no_rejects_garbage() {
        let mut out = Vec::new();
        let mut prompter = Prompter::new("maybe\nY\n".as_bytes(), &mut out);
        assert!(prompter.prompt_yes_no("Smoker", false).unwrap());
    }
}
