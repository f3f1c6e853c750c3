// src/io/problem_io.rs

use anyhow::{bail, Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::geo::{Facility, Point};
use crate::models::stats_models::RadiusResult;

/// Plain-array problem document produced by the upstream loader.
/// `demand_points` is required; `facilities` defaults to none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemInput {
    pub demand_points: Vec<[f64; 2]>,
    #[serde(default)]
    pub facilities: Vec<Facility>,
}

impl ProblemInput {
    pub fn demand(&self) -> Vec<Point> {
        self.demand_points.iter().map(|p| Point::from(*p)).collect()
    }

    /// Rejects non-finite or out-of-range coordinates, reporting the first offender.
    pub fn validate(&self) -> Result<()> {
        if let Some((idx, p)) = self.demand().iter().enumerate().find(|(_, p)| !p.is_valid_coordinate()) {
            bail!("Demand point {} has invalid coordinates ({}, {})", idx, p.lat, p.lon);
        }
        if let Some((idx, f)) = self.facilities.iter().enumerate().find(|(_, f)| !f.point().is_valid_coordinate()) {
            bail!("Facility {} has invalid coordinates ({}, {})", idx, f.lat, f.lon);
        }
        Ok(())
    }
}

pub fn parse_input(raw: &str) -> Result<ProblemInput> {
    let input: ProblemInput =
        serde_json::from_str(raw).context("Input document is not a valid problem description")?;
    input.validate()?;
    Ok(input)
}

pub fn load_input(path: &Path) -> Result<ProblemInput> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file {}", path.display()))?;
    let input = parse_input(&raw).with_context(|| format!("Failed to load {}", path.display()))?;
    info!(
        "Loaded {} demand points and {} facilities from {}",
        input.demand_points.len(),
        input.facilities.len(),
        path.display()
    );
    Ok(input)
}

pub fn result_file_name(result: &RadiusResult) -> String {
    format!("optimal_shelters_{}_{}m.json", result.scenario, result.radius_m)
}

/// Writes `result` as pretty JSON into `output_dir`, creating it if needed.
pub fn write_result(output_dir: &Path, result: &RadiusResult) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;
    let path = output_dir.join(result_file_name(result));
    let json = serde_json::to_string_pretty(result).context("Failed to serialize radius result")?;
    fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::DegreeRadius;
    use crate::models::geo::FacilityStatus;
    use crate::models::stats_models::{CoverageStatistics, GenerationSummary};
    use chrono::Utc;

    #[test]
    fn test_parse_with_and_without_facilities() {
        let input = parse_input(
            r#"{"demand_points": [[31.5, 34.8], [31.6, 34.9]],
                "facilities": [{"lat": 31.5, "lon": 34.8, "status": "Built"},
                               {"lat": 31.7, "lon": 34.7, "status": "planned"},
                               {"lat": 31.8, "lon": 34.6}]}"#,
        )
        .unwrap();
        assert_eq!(input.demand(), vec![Point::new(31.5, 34.8), Point::new(31.6, 34.9)]);
        assert_eq!(input.facilities[0].status, FacilityStatus::Built);
        assert_eq!(input.facilities[1].status, FacilityStatus::Planned);
        assert_eq!(input.facilities[2].status, FacilityStatus::Other(String::new()));

        let bare = parse_input(r#"{"demand_points": []}"#).unwrap();
        assert!(bare.demand_points.is_empty());
        assert!(bare.facilities.is_empty());
    }

    #[test]
    fn test_missing_demand_points_is_fatal() {
        assert!(parse_input(r#"{"facilities": []}"#).is_err());
        assert!(parse_input("not json").is_err());
    }

    #[test]
    fn test_out_of_range_coordinates_are_rejected() {
        let err = parse_input(r#"{"demand_points": [[31.5, 34.8]], "facilities": [{"lat": 1e300, "lon": 34.8, "status": "built"}]}"#)
            .unwrap_err();
        assert!(format!("{:#}", err).contains("Facility 0"));
        assert!(parse_input(r#"{"demand_points": [[31.5, 34.8], [91.0, 34.8]]}"#).is_err());
        assert!(parse_input(r#"{"demand_points": [[31.5, 181.0]]}"#).is_err());
        assert!(parse_input(r#"{"demand_points": [[-90.0, -180.0], [90.0, 180.0]]}"#).is_ok());
    }

    #[test]
    fn test_write_and_load_files() {
        let dir = tempfile::tempdir().unwrap();
        let input_path = dir.path().join("problem.json");
        fs::write(&input_path, r#"{"demand_points": [[31.5, 34.8]]}"#).unwrap();
        assert_eq!(load_input(&input_path).unwrap().demand_points.len(), 1);
        assert!(load_input(&dir.path().join("missing.json")).is_err());

        let result = RadiusResult {
            run_id: "run".to_string(),
            generated_at: Utc::now().naive_utc(),
            radius_m: 150.0,
            radius_deg: 150.0 / 111_000.0,
            reference_latitude: 31.5,
            local_extent_deg: DegreeRadius { lat: 150.0 / 111_000.0, lon: 0.0016 },
            scenario: "without_planned".to_string(),
            optimal_locations: Vec::new(),
            existing_facilities: Vec::new(),
            statistics: CoverageStatistics {
                total_demand: 0,
                total_population: 0,
                sites_selected: 0,
                existing_coverage: 0,
                new_coverage: 0,
                new_population_covered: 0,
                total_coverage: 0,
                total_population_covered: 0,
                coverage_percentage: 100.0,
                avg_per_new_site: 0.0,
            },
            generation: GenerationSummary::default(),
        };
        let out_dir = dir.path().join("out");
        let path = write_result(&out_dir, &result).unwrap();
        assert!(path.ends_with("optimal_shelters_without_planned_150m.json"));

        let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written["radius_m"], 150.0);
        assert_eq!(written["statistics"]["coverage_percentage"], 100.0);
        assert!(written["optimal_locations"].as_array().unwrap().is_empty());
    }
}
