// src/candidate_generation/density_candidates.rs

use anyhow::{Context, Result};

use crate::candidate_generation::GeneratorOutput;
use crate::clustering::density::dbscan;
use crate::coverage::CoverageScorer;
use crate::models::candidates::{density_config_key, CandidateMethod, CandidateSite};
use crate::models::geo::Point;

/// One density configuration: eps = `eps_multiplier` x coverage radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensityRun {
    pub eps_multiplier: f64,
    pub min_samples: usize,
    /// Baseline runs emit centroids only and report under `original_dbscan`.
    pub baseline: bool,
}

impl DensityRun {
    pub fn config_key(&self) -> String {
        if self.baseline {
            "original_dbscan".to_string()
        } else {
            density_config_key(self.eps_multiplier, self.min_samples)
        }
    }
}

/// Clusters the residual demand and emits centroid, medoid and (for small
/// clusters) best-member candidates, each scored against the full residual set.
pub fn generate_density_candidates(
    residual: &[Point],
    radius_deg: f64,
    run: &DensityRun,
    min_points_per_cluster: usize,
    best_point_max_cluster_size: usize,
) -> Result<GeneratorOutput> {
    let config_key = run.config_key();
    let eps = radius_deg * run.eps_multiplier;
    let clustering = dbscan(residual, eps, run.min_samples)
        .with_context(|| format!("Density clustering failed for {}", config_key))?;
    let scorer = CoverageScorer::new(residual, radius_deg);

    let (centroid_method, medoid_method, best_method) = if run.baseline {
        (CandidateMethod::BaselineDensityCentroid, None, None)
    } else {
        let (eps_multiplier, min_points) = (run.eps_multiplier, run.min_samples);
        (
            CandidateMethod::DensityCentroid { eps_multiplier, min_points },
            Some(CandidateMethod::DensityMedoid { eps_multiplier, min_points }),
            Some(CandidateMethod::DensityBest { eps_multiplier, min_points }),
        )
    };

    let mut candidates = Vec::new();
    let clusters = clustering.members();
    for members in &clusters {
        let cluster_size = members.len();
        if cluster_size < min_points_per_cluster {
            continue;
        }
        let member_points: Vec<Point> = members.iter().map(|&i| residual[i]).collect();
        let Some(centroid) = Point::centroid(&member_points) else {
            continue;
        };

        let mut push = |site: Point, coverage: usize, method: &CandidateMethod| {
            if coverage >= min_points_per_cluster {
                candidates.push(CandidateSite::new(site, coverage, method.clone(), cluster_size));
            }
        };

        push(centroid, scorer.score(&centroid), &centroid_method);

        if let Some(method) = &medoid_method {
            let medoid = member_points
                .iter()
                .min_by(|a, b| {
                    a.distance_squared(&centroid)
                        .partial_cmp(&b.distance_squared(&centroid))
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .copied();
            if let Some(medoid) = medoid {
                push(medoid, scorer.score(&medoid), method);
            }
        }

        if let Some(method) = &best_method {
            if cluster_size <= best_point_max_cluster_size {
                let mut best: Option<(Point, usize)> = None;
                for p in &member_points {
                    let coverage = scorer.score(p);
                    if best.map_or(true, |(_, c)| coverage > c) {
                        best = Some((*p, coverage));
                    }
                }
                if let Some((p, coverage)) = best {
                    push(p, coverage, method);
                }
            }
        }
    }

    Ok(GeneratorOutput {
        config_key,
        candidates,
        clusters_found: clusters.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster(center: Point, n: usize, step: f64) -> Vec<Point> {
        (0..n)
            .map(|i| Point::new(center.lat + (i % 4) as f64 * step, center.lon + (i / 4) as f64 * step))
            .collect()
    }

    #[test]
    fn test_emits_centroid_medoid_and_best() {
        let residual = cluster(Point::new(0.0, 0.0), 12, 0.0001);
        let run = DensityRun { eps_multiplier: 0.5, min_samples: 3, baseline: false };
        let out = generate_density_candidates(&residual, 0.001, &run, 5, 50).unwrap();

        assert_eq!(out.config_key, "dbscan_eps0.5_min3");
        assert_eq!(out.clusters_found, 1);
        assert_eq!(out.candidates.len(), 3);
        let tags: Vec<String> = out.candidates.iter().map(|c| c.method.to_string()).collect();
        assert_eq!(
            tags,
            vec!["dbscan_centroid_eps0.5_min3", "dbscan_medoid_eps0.5_min3", "dbscan_best_eps0.5_min3"]
        );
        // The radius spans the whole cluster, so every candidate covers all of it.
        assert!(out.candidates.iter().all(|c| c.buildings_covered == 12 && c.source_cluster_size == 12));
    }

    #[test]
    fn test_coverage_counts_points_outside_the_cluster() {
        // A dense cluster plus sparse points that are noise at small eps but
        // still inside the coverage radius of the centroid.
        let mut residual = cluster(Point::new(0.0, 0.0), 8, 0.0001);
        residual.push(Point::new(0.0008, 0.0));
        residual.push(Point::new(0.0, 0.0009));
        let run = DensityRun { eps_multiplier: 0.2, min_samples: 3, baseline: false };
        let out = generate_density_candidates(&residual, 0.001, &run, 5, 50).unwrap();

        let centroid = out.candidates.iter().find(|c| matches!(c.method, CandidateMethod::DensityCentroid { .. })).unwrap();
        assert_eq!(centroid.source_cluster_size, 8);
        assert_eq!(centroid.buildings_covered, 10);
    }

    #[test]
    fn test_baseline_emits_centroids_only() {
        let residual = cluster(Point::new(0.0, 0.0), 12, 0.0001);
        let run = DensityRun { eps_multiplier: 1.0, min_samples: 5, baseline: true };
        let out = generate_density_candidates(&residual, 0.001, &run, 5, 50).unwrap();
        assert_eq!(out.config_key, "original_dbscan");
        assert_eq!(out.candidates.len(), 1);
        assert_eq!(out.candidates[0].method, CandidateMethod::BaselineDensityCentroid);
    }

    #[test]
    fn test_best_point_skipped_for_large_clusters() {
        let residual = cluster(Point::new(0.0, 0.0), 12, 0.0001);
        let run = DensityRun { eps_multiplier: 0.5, min_samples: 3, baseline: false };
        let out = generate_density_candidates(&residual, 0.001, &run, 5, 10).unwrap();
        assert_eq!(out.candidates.len(), 2);
    }

    #[test]
    fn test_sub_threshold_candidates_discarded() {
        let residual = cluster(Point::new(0.0, 0.0), 4, 0.0001);
        let run = DensityRun { eps_multiplier: 0.5, min_samples: 2, baseline: false };
        let out = generate_density_candidates(&residual, 0.001, &run, 5, 50).unwrap();
        assert_eq!(out.clusters_found, 1);
        assert!(out.candidates.is_empty());
    }
}
