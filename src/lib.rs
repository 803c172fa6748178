//! Heuristic fracture-risk screening index.
//!
//! Collects common clinical risk factors, scores them with a fixed-weight
//! linear model and a logistic transform, and maps the 0-100 index onto an
//! interpretation band. The index is a screening aid, not a validated
//! 10-year fracture probability (see FRAX for that).

pub mod config;
pub mod export;
pub mod form;
pub mod output;
pub mod patient;
pub mod scoring;
