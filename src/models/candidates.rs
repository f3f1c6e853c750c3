// src/models/candidates.rs

use serde::{Serialize, Serializer};
use std::fmt;

use crate::models::geo::Point;

/// Which generator configuration produced a candidate site.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateMethod {
    /// Centroid of a cluster from the baseline density run (eps = radius).
    BaselineDensityCentroid,
    DensityCentroid { eps_multiplier: f64, min_points: usize },
    DensityMedoid { eps_multiplier: f64, min_points: usize },
    DensityBest { eps_multiplier: f64, min_points: usize },
    PartitionCentroid { k: usize, seed: usize },
}

impl CandidateMethod {
    /// Key of the generator configuration this method belongs to, used for
    /// the candidate-source summary.
    pub fn config_key(&self) -> String {
        match self {
            CandidateMethod::BaselineDensityCentroid => "original_dbscan".to_string(),
            CandidateMethod::DensityCentroid { eps_multiplier, min_points }
            | CandidateMethod::DensityMedoid { eps_multiplier, min_points }
            | CandidateMethod::DensityBest { eps_multiplier, min_points } => {
                density_config_key(*eps_multiplier, *min_points)
            }
            CandidateMethod::PartitionCentroid { k, seed } => partition_config_key(*k, *seed),
        }
    }

    pub fn is_density(&self) -> bool {
        !matches!(self, CandidateMethod::PartitionCentroid { .. })
    }
}

pub fn density_config_key(eps_multiplier: f64, min_points: usize) -> String {
    format!("dbscan_eps{:?}_min{}", eps_multiplier, min_points)
}

/// Seeds are reported 1-based.
pub fn partition_config_key(k: usize, seed: usize) -> String {
    format!("kmeans_k{}_seed{}", k, seed + 1)
}

impl fmt::Display for CandidateMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateMethod::BaselineDensityCentroid => write!(f, "original_dbscan_centroid"),
            CandidateMethod::DensityCentroid { eps_multiplier, min_points } => {
                write!(f, "dbscan_centroid_eps{:?}_min{}", eps_multiplier, min_points)
            }
            CandidateMethod::DensityMedoid { eps_multiplier, min_points } => {
                write!(f, "dbscan_medoid_eps{:?}_min{}", eps_multiplier, min_points)
            }
            CandidateMethod::DensityBest { eps_multiplier, min_points } => {
                write!(f, "dbscan_best_eps{:?}_min{}", eps_multiplier, min_points)
            }
            CandidateMethod::PartitionCentroid { .. } => f.write_str(&self.config_key()),
        }
    }
}

impl Serialize for CandidateMethod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A prospective facility location. `buildings_covered` is counted against the
/// full residual demand set, never only the generating cluster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateSite {
    pub lat: f64,
    pub lon: f64,
    pub buildings_covered: usize,
    pub method: CandidateMethod,
    #[serde(rename = "cluster_size")]
    pub source_cluster_size: usize,
}

impl CandidateSite {
    pub fn new(
        point: Point,
        buildings_covered: usize,
        method: CandidateMethod,
        source_cluster_size: usize,
    ) -> Self {
        Self {
            lat: point.lat,
            lon: point.lon,
            buildings_covered,
            method,
            source_cluster_size,
        }
    }

    pub fn point(&self) -> Point {
        Point::new(self.lat, self.lon)
    }
}

/// Sum of `buildings_covered` over a selection.
pub fn total_coverage(sites: &[CandidateSite]) -> usize {
    sites.iter().map(|s| s.buildings_covered).sum()
}

/// True when every pair of sites is at least `min_separation` apart.
pub fn is_pairwise_separated(sites: &[CandidateSite], min_separation: f64) -> bool {
    let min_sq = min_separation * min_separation;
    for (i, a) in sites.iter().enumerate() {
        for b in &sites[i + 1..] {
            if a.point().distance_squared(&b.point()) < min_sq {
                return false;
            }
        }
    }
    true
}
