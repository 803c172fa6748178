use chrono::NaiveDate;
use serde::Serialize;

use crate::patient::PatientInput;
use crate::scoring::ScreeningResult;

/// Column order of the exported record.
pub const COLUMNS: [&str; 9] = [
    "date",
    "age",
    "sex",
    "weight_kg",
    "height_cm",
    "bmi",
    "femoral_neck_bmd",
    "screening_index",
    "interpretation",
];

/// One downloadable result row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreeningRecord {
    pub date: NaiveDate,
    pub age: u32,
    pub sex: String,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub bmi: f64,
    pub femoral_neck_bmd: f64,
    pub screening_index: f64,
    pub interpretation: String,
}

impl ScreeningRecord {
    pub fn new(input: &PatientInput, result: &ScreeningResult, date: NaiveDate) -> Self {
        Self {
            date,
            age: input.age,
            sex: input.sex.to_string(),
            weight_kg: input.weight_kg,
            height_cm: input.height_cm,
            bmi: result.bmi,
            femoral_neck_bmd: input.femoral_neck_bmd,
            screening_index: result.screening_index,
            interpretation: result.interpretation.label().to_string(),
        }
    }

    /// Record stamped with today's local date.
    pub fn today(input: &PatientInput, result: &ScreeningResult) -> Self {
        Self::new(input, result, chrono::Local::now().date_naive())
    }

    /// Cell values in [`COLUMNS`] order, unescaped.
    pub fn values(&self) -> [String; 9] {
        [
            self.date.format("%Y-%m-%d").to_string(),
            self.age.to_string(),
            self.sex.clone(),
            format_real(self.weight_kg),
            format_real(self.height_cm),
            format_real(self.bmi),
            format_real(self.femoral_neck_bmd),
            format_real(self.screening_index),
            self.interpretation.clone(),
        ]
    }

    /// Header row plus one data row, `\n` terminated.
    pub fn to_csv(&self) -> String {
        let header = COLUMNS.join(",");
        let row = self
            .values()
            .iter()
            .map(|v| escape_field(v))
            .collect::<Vec<_>>()
            .join(",");
        format!("{}\n{}\n", header, row)
    }
}

/// Shortest round-trip form that always carries a decimal point: `70.0`, `27.3`.
pub fn format_real(value: f64) -> String {
    let s = value.to_string();
    if !value.is_finite() || s.contains('.') {
        s
    } else {
        format!("{}.0", s)
    }
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{compute_screening, ScreeningModel};

    fn example_record() -> ScreeningRecord {
        let input = PatientInput::default();
        let result = compute_screening(&input, &ScreeningModel::default());
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        ScreeningRecord::new(&input, &result, date)
    }

    #[test]
    fn test_example_one_csv() {
        let csv = example_record().to_csv();
        assert_eq!(
            csv,
            "date,age,sex,weight_kg,height_cm,bmi,femoral_neck_bmd,screening_index,interpretation\n\
             2026-10-19,65,Female,70.0,160.0,27.3,0.0,4.2,Low (screening only).\n"
        );
    }

    #[test]
    fn test_exactly_one_data_row() {
        let csv = example_record().to_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].split(',').count(), COLUMNS.len());
        assert_eq!(lines[1].split(',').count(), COLUMNS.len());
    }

    #[test]
    fn test_today_uses_iso_date() {
        let input = PatientInput::default();
        let result = compute_screening(&input, &ScreeningModel::default());
        let record = ScreeningRecord::today(&input, &result);
        let date = &record.values()[0];
        assert_eq!(date.len(), 10);
        assert!(NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok());
    }

    #[test]
    fn test_format_real() {
        assert_eq!(format_real(70.0), "70.0");
        assert_eq!(format_real(0.0), "0.0");
        assert_eq!(format_real(27.3), "27.3");
        assert_eq!(format_real(0.72), "0.72");
        assert_eq!(format_real(100.0), "100.0");
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
