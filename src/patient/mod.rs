pub mod types;
pub mod validation;

pub use types::{round_to_tenth, PatientInput, Sex, BMD_NOT_PROVIDED};
pub use validation::InputError;
