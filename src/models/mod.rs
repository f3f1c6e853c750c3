pub mod candidates;
pub mod geo;
pub mod stats_models;

pub use candidates::{CandidateMethod, CandidateSite};
pub use geo::{Facility, FacilityStatus, Point};
pub use stats_models::{CoverageStatistics, FacilityRecord, GenerationSummary, RadiusResult};
