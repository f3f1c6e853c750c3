// src/utils/optimizer_config.rs

use anyhow::{bail, Result};
use log::{info, warn};

use crate::geometry::scaler::DegreeConvention;
use crate::selection::SelectionStrategy;
use crate::utils::constants::*;
use crate::utils::env::{env_list_or, env_or};

/// Density-based candidate generator settings.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityConfig {
    /// Neighborhood radius as a fraction of the coverage radius.
    pub eps_multipliers: Vec<f64>,
    /// Core-point thresholds (`min_samples`) swept against every multiplier.
    pub min_points: Vec<usize>,
    /// Adds the eps = radius, min = `min_points_per_cluster` centroid-only run.
    pub include_baseline: bool,
    pub best_point_max_cluster_size: usize,
}

impl Default for DensityConfig {
    fn default() -> Self {
        Self {
            eps_multipliers: DEFAULT_EPS_MULTIPLIERS.to_vec(),
            min_points: DEFAULT_DENSITY_MIN_POINTS.to_vec(),
            include_baseline: true,
            best_point_max_cluster_size: BEST_POINT_MAX_CLUSTER_SIZE,
        }
    }
}

/// Partition (k-means) candidate generator settings.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionConfig {
    pub k_values: Vec<usize>,
    pub seeds_per_k: usize,
    /// Independent initializations per (k, seed); the lowest-inertia run wins.
    pub n_init: usize,
    pub max_iterations: usize,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            k_values: DEFAULT_PARTITION_K_VALUES.to_vec(),
            seeds_per_k: DEFAULT_PARTITION_SEEDS,
            n_init: DEFAULT_PARTITION_INITS,
            max_iterations: DEFAULT_PARTITION_MAX_ITERATIONS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionConfig {
    /// Strategies compared by the selector, in evaluation order.
    pub strategies: Vec<SelectionStrategy>,
    pub seed: u64,
    pub random_trials: usize,
    pub local_search_max_passes: usize,
    pub lookahead_width: usize,
    pub lookahead_future_window: usize,
    pub lookahead_bonus: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            strategies: SelectionStrategy::all().to_vec(),
            seed: DEFAULT_SELECTION_SEED,
            random_trials: DEFAULT_RANDOM_TRIALS,
            local_search_max_passes: DEFAULT_LOCAL_SEARCH_PASSES,
            lookahead_width: DEFAULT_LOOKAHEAD_WIDTH,
            lookahead_future_window: DEFAULT_LOOKAHEAD_FUTURE_WINDOW,
            lookahead_bonus: DEFAULT_LOOKAHEAD_BONUS,
        }
    }
}

/// Everything one optimization run needs. Threaded through the pipeline
/// instead of module-level globals.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerConfig {
    pub target_count: usize,
    pub radii_m: Vec<f64>,
    /// Clusters and candidates below this many buildings are discarded.
    pub min_points_per_cluster: usize,
    /// Reporting only: people per building.
    pub occupancy_per_building: u64,
    pub include_planned: bool,
    pub degree_convention: DegreeConvention,
    pub min_separation_factor: f64,
    pub dedup_factor: f64,
    pub density: DensityConfig,
    pub partition: PartitionConfig,
    pub selection: SelectionConfig,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            target_count: DEFAULT_TARGET_COUNT,
            radii_m: DEFAULT_RADII_METERS.to_vec(),
            min_points_per_cluster: DEFAULT_MIN_POINTS_PER_CLUSTER,
            occupancy_per_building: DEFAULT_OCCUPANCY_PER_BUILDING,
            include_planned: false,
            degree_convention: DegreeConvention::LatitudeDegrees,
            min_separation_factor: DEFAULT_MIN_SEPARATION_FACTOR,
            dedup_factor: DEFAULT_DEDUP_FACTOR,
            density: DensityConfig::default(),
            partition: PartitionConfig::default(),
            selection: SelectionConfig::default(),
        }
    }
}

impl OptimizerConfig {
    /// Create configuration from environment variables, defaulting anything unset.
    pub fn from_env() -> Self {
        let d = Self::default();

        let degree_convention = std::env::var("SHELTER_DEGREE_CONVENTION")
            .ok()
            .and_then(|s| DegreeConvention::parse(&s))
            .unwrap_or(d.degree_convention);

        let strategies: Vec<SelectionStrategy> = std::env::var("SHELTER_SELECTION_STRATEGIES")
            .unwrap_or_else(|_| String::new())
            .split(',')
            .filter_map(|s| {
                let s = s.trim();
                if s.is_empty() {
                    return None;
                }
                let parsed = SelectionStrategy::parse(s);
                if parsed.is_none() {
                    warn!("Ignoring unknown selection strategy '{}'", s);
                }
                parsed
            })
            .collect();

        Self {
            target_count: env_or("SHELTER_TARGET_COUNT", d.target_count),
            radii_m: env_list_or("SHELTER_RADII_METERS", d.radii_m),
            min_points_per_cluster: env_or("SHELTER_MIN_POINTS_PER_CLUSTER", d.min_points_per_cluster),
            occupancy_per_building: env_or("SHELTER_OCCUPANCY_PER_BUILDING", d.occupancy_per_building),
            include_planned: env_or("SHELTER_INCLUDE_PLANNED", d.include_planned),
            degree_convention,
            min_separation_factor: env_or("SHELTER_MIN_SEPARATION_FACTOR", d.min_separation_factor),
            dedup_factor: env_or("SHELTER_DEDUP_FACTOR", d.dedup_factor),
            density: DensityConfig {
                eps_multipliers: env_list_or("SHELTER_DENSITY_EPS_MULTIPLIERS", d.density.eps_multipliers),
                min_points: env_list_or("SHELTER_DENSITY_MIN_POINTS", d.density.min_points),
                include_baseline: env_or("SHELTER_INCLUDE_BASELINE_DENSITY", d.density.include_baseline),
                best_point_max_cluster_size: d.density.best_point_max_cluster_size,
            },
            partition: PartitionConfig {
                k_values: env_list_or("SHELTER_PARTITION_K_VALUES", d.partition.k_values),
                seeds_per_k: env_or("SHELTER_PARTITION_SEEDS", d.partition.seeds_per_k),
                n_init: env_or("SHELTER_PARTITION_INITS", d.partition.n_init),
                max_iterations: env_or("SHELTER_PARTITION_MAX_ITERATIONS", d.partition.max_iterations),
            },
            selection: SelectionConfig {
                strategies: if strategies.is_empty() { d.selection.strategies } else { strategies },
                seed: env_or("SHELTER_SELECTION_SEED", d.selection.seed),
                random_trials: env_or("SHELTER_RANDOM_TRIALS", d.selection.random_trials),
                local_search_max_passes: env_or("SHELTER_LOCAL_SEARCH_PASSES", d.selection.local_search_max_passes),
                lookahead_width: env_or("SHELTER_LOOKAHEAD_WIDTH", d.selection.lookahead_width),
                lookahead_future_window: d.selection.lookahead_future_window,
                lookahead_bonus: d.selection.lookahead_bonus,
            },
        }
    }

    /// Rejects settings that would make a run meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.radii_m.iter().any(|r| !r.is_finite() || *r <= 0.0) {
            bail!("All coverage radii must be positive and finite, got {:?}", self.radii_m);
        }
        if !(self.min_separation_factor.is_finite() && self.min_separation_factor >= 0.0) {
            bail!("Minimum separation factor must be >= 0, got {}", self.min_separation_factor);
        }
        if !(self.dedup_factor.is_finite() && self.dedup_factor > 0.0) {
            bail!("Deduplication factor must be > 0, got {}", self.dedup_factor);
        }
        if self.density.eps_multipliers.iter().any(|m| !m.is_finite() || *m <= 0.0) {
            bail!("Density eps multipliers must be positive, got {:?}", self.density.eps_multipliers);
        }
        if self.density.min_points.iter().any(|m| *m == 0) {
            bail!("Density min_points values must be >= 1");
        }
        if self.partition.k_values.iter().any(|k| *k == 0) {
            bail!("Partition k values must be >= 1");
        }
        if self.partition.n_init == 0 || self.partition.max_iterations == 0 {
            bail!("Partition n_init and max_iterations must be >= 1");
        }
        if self.selection.strategies.is_empty() {
            bail!("At least one selection strategy must be enabled");
        }
        if self.selection.strategies.contains(&SelectionStrategy::WeightedRandom) && self.selection.random_trials == 0 {
            bail!("Weighted-random selection needs at least one trial");
        }
        Ok(())
    }

    pub fn scenario_name(&self) -> &'static str {
        if self.include_planned {
            "with_planned"
        } else {
            "without_planned"
        }
    }

    /// Number of generator tasks one radius will fan out.
    pub fn generator_task_count(&self) -> usize {
        let density = self.density.eps_multipliers.len() * self.density.min_points.len()
            + usize::from(self.density.include_baseline);
        density + self.partition.k_values.len() * self.partition.seeds_per_k
    }

    pub fn log_config(&self) {
        info!("🏠 Shelter optimizer configuration");
        info!("   Target sites per radius: {}", self.target_count);
        info!("   Radii (m): {:?}", self.radii_m);
        info!("   Scenario: {}", self.scenario_name());
        info!(
            "   Min buildings per cluster: {}, occupancy per building: {}",
            self.min_points_per_cluster, self.occupancy_per_building
        );
        info!("   Degree convention: {:?}", self.degree_convention);
        info!(
            "   Density: eps multipliers {:?} x min_points {:?} (baseline: {})",
            self.density.eps_multipliers, self.density.min_points, self.density.include_baseline
        );
        info!(
            "   Partition: k {:?} x {} seeds ({} inits, {} max iterations)",
            self.partition.k_values,
            self.partition.seeds_per_k,
            self.partition.n_init,
            self.partition.max_iterations
        );
        info!(
            "   Separation factor: {}x radius, dedup factor: {}x radius",
            self.min_separation_factor, self.dedup_factor
        );
        info!(
            "   Selection: {:?} (seed {}, {} random trials)",
            self.selection.strategies, self.selection.seed, self.selection.random_trials
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_default_config_is_valid() {
        let config = OptimizerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.target_count, 150);
        assert_eq!(config.min_points_per_cluster, 5);
        assert_eq!(config.density.min_points, vec![10]);
        // 10 multipliers x 1 threshold + baseline + 2 k values x 2 seeds
        assert_eq!(config.generator_task_count(), 15);
        assert_eq!(config.scenario_name(), "without_planned");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = OptimizerConfig::default();
        config.radii_m = vec![100.0, -5.0];
        assert!(config.validate().is_err());

        let mut config = OptimizerConfig::default();
        config.dedup_factor = 0.0;
        assert!(config.validate().is_err());

        let mut config = OptimizerConfig::default();
        config.selection.strategies.clear();
        assert!(config.validate().is_err());

        let mut config = OptimizerConfig::default();
        config.partition.k_values = vec![0];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_random_trials() {
        let mut config = OptimizerConfig::default();
        config.selection.random_trials = 0;
        assert!(config.validate().is_err());

        config.selection.strategies = vec![SelectionStrategy::WeightedRandom];
        assert!(config.validate().is_err());

        // Without weighted-random the trial count is unused.
        config.selection.strategies = vec![SelectionStrategy::Greedy];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_env_overrides() {
        env::set_var("SHELTER_TARGET_COUNT", "12");
        env::set_var("SHELTER_RADII_METERS", "50,75");
        env::set_var("SHELTER_SELECTION_STRATEGIES", "greedy, bogus ,lookahead");
        env::set_var("SHELTER_DEGREE_CONVENTION", "metric100k");

        let config = OptimizerConfig::from_env();
        assert_eq!(config.target_count, 12);
        assert_eq!(config.radii_m, vec![50.0, 75.0]);
        assert_eq!(
            config.selection.strategies,
            vec![SelectionStrategy::Greedy, SelectionStrategy::Lookahead]
        );
        assert_eq!(config.degree_convention, DegreeConvention::Metric100k);

        env::remove_var("SHELTER_TARGET_COUNT");
        env::remove_var("SHELTER_RADII_METERS");
        env::remove_var("SHELTER_SELECTION_STRATEGIES");
        env::remove_var("SHELTER_DEGREE_CONVENTION");
    }
}
