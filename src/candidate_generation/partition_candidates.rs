// src/candidate_generation/partition_candidates.rs

use anyhow::{Context, Result};

use crate::candidate_generation::GeneratorOutput;
use crate::clustering::partition::kmeans;
use crate::coverage::CoverageScorer;
use crate::models::candidates::{partition_config_key, CandidateMethod, CandidateSite};
use crate::models::geo::Point;

/// One partition configuration. `seed` is the 0-based seed index within `k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionRun {
    pub k: usize,
    pub seed: usize,
    pub n_init: usize,
    pub max_iterations: usize,
}

impl PartitionRun {
    pub fn config_key(&self) -> String {
        partition_config_key(self.k, self.seed)
    }

    /// RNG seed derived from (k, seed index) so runs are reproducible and
    /// distinct across the grid.
    pub fn rng_seed(&self) -> u64 {
        self.k as u64 + self.seed as u64 * 100
    }
}

/// Emits every partition centroid covering at least `min_points_per_cluster`
/// residual demand points.
pub fn generate_partition_candidates(
    residual: &[Point],
    radius_deg: f64,
    run: &PartitionRun,
    min_points_per_cluster: usize,
) -> Result<GeneratorOutput> {
    let config_key = run.config_key();
    let partition = kmeans(residual, run.k, run.n_init, run.max_iterations, run.rng_seed())
        .with_context(|| format!("Partitioning failed for {}", config_key))?;
    let scorer = CoverageScorer::new(residual, radius_deg);
    let sizes = partition.cluster_sizes();

    let method = CandidateMethod::PartitionCentroid { k: run.k, seed: run.seed };
    let candidates: Vec<CandidateSite> = partition
        .centroids
        .iter()
        .zip(sizes)
        .filter_map(|(centroid, size)| {
            let coverage = scorer.score(centroid);
            (coverage >= min_points_per_cluster)
                .then(|| CandidateSite::new(*centroid, coverage, method.clone(), size))
        })
        .collect();

    Ok(GeneratorOutput {
        config_key,
        candidates,
        clusters_found: partition.centroids.len(),
    })
}
