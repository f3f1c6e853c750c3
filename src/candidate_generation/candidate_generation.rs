// src/candidate_generation/candidate_generation.rs

use anyhow::{anyhow, Context, Result};
use futures::future::join_all;
use indicatif::MultiProgress;
use log::{debug, info};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use crate::candidate_generation::density_candidates::{generate_density_candidates, DensityRun};
use crate::candidate_generation::partition_candidates::{generate_partition_candidates, PartitionRun};
use crate::models::candidates::CandidateSite;
use crate::models::geo::Point;
use crate::utils::env::env_or;
use crate::utils::logging::RadiusLogger;
use crate::utils::optimizer_config::OptimizerConfig;
use crate::utils::progress_config::add_sub_progress_bar;

/// Upper bound on generator jobs running at once, shared by every radius.
static MAX_CONCURRENT_GENERATORS: Lazy<usize> = Lazy::new(|| {
    env_or("MAX_CONCURRENT_GENERATORS", num_cpus::get().min(8)).max(1)
});

static GENERATOR_SEMAPHORE: Lazy<Arc<Semaphore>> =
    Lazy::new(|| Arc::new(Semaphore::new(*MAX_CONCURRENT_GENERATORS)));

/// Candidates produced by a single generator configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorOutput {
    pub config_key: String,
    pub candidates: Vec<CandidateSite>,
    pub clusters_found: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeneratorTask {
    Density(DensityRun),
    Partition(PartitionRun),
}

impl GeneratorTask {
    pub fn config_key(&self) -> String {
        match self {
            GeneratorTask::Density(run) => run.config_key(),
            GeneratorTask::Partition(run) => run.config_key(),
        }
    }

    pub fn run(
        &self,
        residual: &[Point],
        radius_deg: f64,
        config: &OptimizerConfig,
    ) -> Result<GeneratorOutput> {
        match self {
            GeneratorTask::Density(run) => generate_density_candidates(
                residual,
                radius_deg,
                run,
                config.min_points_per_cluster,
                config.density.best_point_max_cluster_size,
            ),
            GeneratorTask::Partition(run) => {
                generate_partition_candidates(residual, radius_deg, run, config.min_points_per_cluster)
            }
        }
    }
}

/// Generator grid in pool order: baseline density run, density multipliers x
/// thresholds, then partition k values x seeds.
pub fn plan_generator_tasks(config: &OptimizerConfig) -> Vec<GeneratorTask> {
    let mut tasks = Vec::with_capacity(config.generator_task_count());
    if config.density.include_baseline {
        tasks.push(GeneratorTask::Density(DensityRun {
            eps_multiplier: 1.0,
            min_samples: config.min_points_per_cluster.max(1),
            baseline: true,
        }));
    }
    for &eps_multiplier in &config.density.eps_multipliers {
        for &min_samples in &config.density.min_points {
            tasks.push(GeneratorTask::Density(DensityRun {
                eps_multiplier,
                min_samples,
                baseline: false,
            }));
        }
    }
    for &k in &config.partition.k_values {
        for seed in 0..config.partition.seeds_per_k {
            tasks.push(GeneratorTask::Partition(PartitionRun {
                k,
                seed,
                n_init: config.partition.n_init,
                max_iterations: config.partition.max_iterations,
            }));
        }
    }
    tasks
}

/// Merged output of every generator configuration for one radius.
#[derive(Debug, Clone, Default)]
pub struct CandidatePool {
    pub candidates: Vec<CandidateSite>,
    pub sources: BTreeMap<String, usize>,
    pub failed_configurations: Vec<String>,
}

/// Runs every generator configuration as a blocking job on the shared worker
/// pool and merges the results, in configuration order, once all have
/// finished. A failing or panicking configuration is logged and recorded but
/// never cancels its siblings.
pub async fn generate_candidate_pool(
    residual: Arc<Vec<Point>>,
    radius_deg: f64,
    config: Arc<OptimizerConfig>,
    logger: &RadiusLogger,
    multi_progress: Option<&MultiProgress>,
) -> Result<CandidatePool> {
    let tasks = plan_generator_tasks(&config);
    run_generator_tasks(
        tasks,
        residual,
        radius_deg,
        config,
        logger,
        multi_progress,
        |task, residual, radius_deg, config| task.run(residual, radius_deg, config),
    )
    .await
}

async fn run_generator_tasks<R>(
    tasks: Vec<GeneratorTask>,
    residual: Arc<Vec<Point>>,
    radius_deg: f64,
    config: Arc<OptimizerConfig>,
    logger: &RadiusLogger,
    multi_progress: Option<&MultiProgress>,
    runner: R,
) -> Result<CandidatePool>
where
    R: Fn(&GeneratorTask, &[Point], f64, &OptimizerConfig) -> Result<GeneratorOutput>
        + Send
        + Sync
        + 'static,
{
    let start = Instant::now();
    let runner = Arc::new(runner);
    debug!(
        "[{}] Spawning {} generator tasks ({} worker slots)",
        logger.tag(),
        tasks.len(),
        *MAX_CONCURRENT_GENERATORS
    );

    let pb = add_sub_progress_bar(
        multi_progress,
        tasks.len() as u64,
        format!("[{}] candidate generators", logger.tag()),
    )?;

    let handles: Vec<JoinHandle<Result<GeneratorOutput>>> = tasks
        .iter()
        .map(|task| {
            let task = *task;
            let residual = residual.clone();
            let config = config.clone();
            let runner = runner.clone();
            let semaphore = GENERATOR_SEMAPHORE.clone();
            let pb = pb.clone();
            tokio::spawn(async move {
                let permit = semaphore
                    .acquire_owned()
                    .await
                    .context("Failed to acquire generator permit")?;
                let _permit_guard = permit;
                let key = task.config_key();
                let outcome = tokio::task::spawn_blocking(move || {
                    (*runner)(&task, residual.as_slice(), radius_deg, &config)
                })
                .await
                .map_err(|e| anyhow!("Generator {} panicked: {}", key, e))?;
                if let Some(pb) = &pb {
                    pb.inc(1);
                }
                outcome
            })
        })
        .collect();

    let results = join_all(handles).await;

    let mut pool = CandidatePool::default();
    for (task, join_result) in tasks.iter().zip(results) {
        let key = task.config_key();
        let outcome = join_result
            .map_err(|e| anyhow!("Generator task {} failed to join: {}", key, e))
            .and_then(|r| r);
        match outcome {
            Ok(output) => {
                logger.log_generator_result(&output.config_key, output.candidates.len(), output.clusters_found);
                pool.sources.insert(output.config_key, output.candidates.len());
                pool.candidates.extend(output.candidates);
            }
            Err(e) => {
                logger.log_generator_failure(&key, &e);
                pool.failed_configurations.push(key);
            }
        }
    }

    if let Some(pb) = pb {
        pb.finish_with_message(format!(
            "[{}] {} candidates from {} configurations",
            logger.tag(),
            pool.candidates.len(),
            pool.sources.len()
        ));
    }
    info!(
        "[{}] 🏠 🧩 Generated {} candidates from {}/{} configurations in {:.2?}",
        logger.tag(),
        pool.candidates.len(),
        pool.sources.len(),
        tasks.len(),
        start.elapsed()
    );
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidates::CandidateMethod;

    fn small_config() -> OptimizerConfig {
        let mut config = OptimizerConfig::default();
        config.min_points_per_cluster = 3;
        config.density.eps_multipliers = vec![0.5, 1.0];
        config.density.min_points = vec![3];
        config.partition.k_values = vec![2, 100];
        config.partition.seeds_per_k = 2;
        config.partition.n_init = 2;
        config
    }

    fn blobs() -> Vec<Point> {
        let mut points = Vec::new();
        for i in 0..8 {
            let offset = (i % 4) as f64 * 0.0001;
            let row = (i / 4) as f64 * 0.0001;
            points.push(Point::new(offset, row));
            points.push(Point::new(0.05 + offset, 0.05 + row));
        }
        points
    }

    #[test]
    fn test_plan_order_and_size() {
        let config = small_config();
        let tasks = plan_generator_tasks(&config);
        assert_eq!(tasks.len(), config.generator_task_count());
        let keys: Vec<String> = tasks.iter().map(|t| t.config_key()).collect();
        assert_eq!(
            keys,
            vec![
                "original_dbscan",
                "dbscan_eps0.5_min3",
                "dbscan_eps1.0_min3",
                "kmeans_k2_seed1",
                "kmeans_k2_seed2",
                "kmeans_k100_seed1",
                "kmeans_k100_seed2",
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_configurations_are_isolated() {
        let config = Arc::new(small_config());
        let residual = Arc::new(blobs());
        let logger = RadiusLogger::new(100.0);

        let pool = generate_candidate_pool(residual, 0.001, config, &logger, None)
            .await
            .unwrap();

        // k=100 exceeds the 16 residual points.
        assert_eq!(pool.failed_configurations, vec!["kmeans_k100_seed1", "kmeans_k100_seed2"]);
        assert_eq!(pool.sources.len(), 5);
        assert_eq!(pool.sources["kmeans_k2_seed1"], 2);
        assert!(pool.candidates.iter().all(|c| c.buildings_covered >= 3));
        assert!(pool
            .candidates
            .iter()
            .any(|c| c.method == CandidateMethod::BaselineDensityCentroid));
    }

    #[tokio::test]
    async fn test_panicking_generator_is_isolated() {
        let mut config = small_config();
        config.partition.k_values = vec![2];
        let config = Arc::new(config);
        let logger = RadiusLogger::new(100.0);
        let tasks = plan_generator_tasks(&config);
        let doomed = "dbscan_eps0.5_min3";

        let pool = run_generator_tasks(
            tasks,
            Arc::new(blobs()),
            0.001,
            config,
            &logger,
            None,
            move |task, residual, radius_deg, config| {
                if task.config_key() == doomed {
                    panic!("generator blew up");
                }
                task.run(residual, radius_deg, config)
            },
        )
        .await
        .unwrap();

        assert_eq!(pool.failed_configurations, vec![doomed]);
        assert!(!pool.sources.contains_key(doomed));
        assert_eq!(pool.sources.len(), 4);
        assert!(pool.sources.contains_key("original_dbscan"));
        assert!(pool.sources.contains_key("dbscan_eps1.0_min3"));
        assert_eq!(pool.sources["kmeans_k2_seed2"], 2);
        assert!(!pool.candidates.is_empty());
    }

    #[tokio::test]
    async fn test_pool_is_deterministic() {
        let config = Arc::new(small_config());
        let logger = RadiusLogger::new(100.0);
        let a = generate_candidate_pool(Arc::new(blobs()), 0.001, config.clone(), &logger, None)
            .await
            .unwrap();
        let b = generate_candidate_pool(Arc::new(blobs()), 0.001, config, &logger, None)
            .await
            .unwrap();
        assert_eq!(a.candidates, b.candidates);
        assert_eq!(a.sources, b.sources);
    }
}
