// src/evaluation/coverage_evaluator.rs

use crate::coverage::{count_covered_per_site, coverage_mask};
use crate::models::candidates::CandidateSite;
use crate::models::geo::{Facility, Point};
use crate::models::stats_models::{CoverageStatistics, FacilityRecord};

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Final statistics over the FULL demand set. `existing_covered[i]` marks
/// demand point `i` as served by an active facility; a point covered by both
/// a facility and a new site counts once, as existing coverage.
pub fn evaluate_coverage(
    demand: &[Point],
    existing_covered: &[bool],
    selected: &[CandidateSite],
    radius_deg: f64,
    occupancy_per_building: u64,
) -> CoverageStatistics {
    let total_demand = demand.len();
    let site_points: Vec<Point> = selected.iter().map(|s| s.point()).collect();
    let new_mask = coverage_mask(demand, &site_points, radius_deg);

    let existing_coverage = existing_covered.iter().filter(|c| **c).count();
    let new_coverage = new_mask
        .iter()
        .enumerate()
        .filter(|(i, covered)| **covered && !existing_covered.get(*i).copied().unwrap_or(false))
        .count();
    let total_coverage = existing_coverage + new_coverage;

    let coverage_percentage = if total_demand == 0 {
        100.0
    } else {
        round_to(total_coverage as f64 / total_demand as f64 * 100.0, 2)
    };
    let avg_per_new_site = if selected.is_empty() {
        0.0
    } else {
        round_to(new_coverage as f64 / selected.len() as f64, 1)
    };

    CoverageStatistics {
        total_demand,
        total_population: total_demand as u64 * occupancy_per_building,
        sites_selected: selected.len(),
        existing_coverage,
        new_coverage,
        new_population_covered: new_coverage as u64 * occupancy_per_building,
        total_coverage,
        total_population_covered: total_coverage as u64 * occupancy_per_building,
        coverage_percentage,
        avg_per_new_site,
    }
}

/// Reports every supplied facility with its own reach over the full demand set.
pub fn facility_records(
    demand: &[Point],
    facilities: &[Facility],
    radius_deg: f64,
    include_planned: bool,
    occupancy_per_building: u64,
) -> Vec<FacilityRecord> {
    let points: Vec<Point> = facilities.iter().map(|f| f.point()).collect();
    let counts = count_covered_per_site(&points, demand, radius_deg);
    facilities
        .iter()
        .zip(counts)
        .map(|(f, buildings_covered)| FacilityRecord {
            lat: f.lat,
            lon: f.lon,
            status: f.status.clone(),
            active: f.is_active(include_planned),
            buildings_covered,
            people_covered: buildings_covered as u64 * occupancy_per_building,
        })
        .collect()
}
