pub mod config;
pub mod factors;
pub mod engine;
pub mod validation;

pub use config::*;
pub use factors::{BandThresholds, Interpretation, RiskFactor};
pub use engine::{compute_screening, ScoreBreakdown, ScreeningResult, TermContribution};
pub use validation::validate_model;
