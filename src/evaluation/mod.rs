pub mod coverage_evaluator;

pub use coverage_evaluator::{evaluate_coverage, facility_records};
