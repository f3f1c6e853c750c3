pub mod coverage_filter;

pub use coverage_filter::{
    count_covered_per_site, coverage_mask, filter_existing_coverage, CoverageScorer, ResidualDemand,
};
