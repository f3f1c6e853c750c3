// src/models/stats_models.rs

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::geometry::DegreeRadius;
use crate::models::candidates::CandidateSite;
use crate::models::geo::FacilityStatus;

/// Final coverage statistics for one radius.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageStatistics {
    pub total_demand: usize,
    pub total_population: u64,
    pub sites_selected: usize,
    pub existing_coverage: usize,
    pub new_coverage: usize,
    pub new_population_covered: u64,
    pub total_coverage: usize,
    pub total_population_covered: u64,
    pub coverage_percentage: f64,
    pub avg_per_new_site: f64,
}

/// A supplied facility with its coverage against the full demand set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacilityRecord {
    pub lat: f64,
    pub lon: f64,
    pub status: FacilityStatus,
    pub active: bool,
    pub buildings_covered: usize,
    pub people_covered: u64,
}

/// Bookkeeping from candidate generation, dedup and selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerationSummary {
    /// Viable candidates contributed per generator configuration key.
    pub candidate_sources: BTreeMap<String, usize>,
    pub candidates_generated: usize,
    pub candidates_after_dedup: usize,
    pub failed_configurations: Vec<String>,
    pub selection_strategy: Option<String>,
}

/// The emitted record for one coverage radius.
#[derive(Debug, Clone, Serialize)]
pub struct RadiusResult {
    pub run_id: String,
    pub generated_at: NaiveDateTime,
    pub radius_m: f64,
    /// Isotropic degree radius every coverage test in the run used.
    pub radius_deg: f64,
    pub reference_latitude: f64,
    /// True lat/lon degree extents of `radius_m` at the reference latitude.
    pub local_extent_deg: DegreeRadius,
    pub scenario: String,
    pub optimal_locations: Vec<CandidateSite>,
    pub existing_facilities: Vec<FacilityRecord>,
    pub statistics: CoverageStatistics,
    pub generation: GenerationSummary,
}
