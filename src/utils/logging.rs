// src/utils/logging.rs - Logging helpers for a single-radius optimization run
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::models::stats_models::CoverageStatistics;

#[derive(Clone)]
pub struct RadiusLogger {
    tag: String,
    start_time: Instant,
}

impl RadiusLogger {
    pub fn new(radius_m: f64) -> Self {
        Self {
            tag: format!("{}m", radius_m),
            start_time: Instant::now(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn log_start(&self, run_id: &str, demand: usize, active_facilities: usize, scenario: &str) {
        info!(
            "[{}] 🏠 🚀 Starting shelter optimization (run ID: {}, scenario: {})",
            self.tag, run_id, scenario
        );
        info!(
            "[{}] 🏠 📊 {} demand points, {} active facilities",
            self.tag, demand, active_facilities
        );
    }

    pub fn log_phase(&self, phase: &str, details: Option<&str>) {
        let elapsed = self.start_time.elapsed();
        match details {
            Some(details) => info!(
                "[{}] 🏠 🔄 Phase: {} - {} [+{:.1}s]",
                self.tag, phase, details, elapsed.as_secs_f32()
            ),
            None => info!(
                "[{}] 🏠 🔄 Phase: {} [+{:.1}s]",
                self.tag, phase, elapsed.as_secs_f32()
            ),
        }
    }

    pub fn log_existing_coverage(&self, active: usize, covered: usize, residual: usize, total: usize) {
        if active == 0 {
            info!("[{}] 🏠 ✨ No active facilities - every demand point needs coverage", self.tag);
            return;
        }
        info!(
            "[{}] 🏠 📍 {} active facilities cover {} buildings; {}/{} still need coverage",
            self.tag, active, covered, residual, total
        );
    }

    pub fn log_generator_result(&self, config_key: &str, viable: usize, clusters: usize) {
        debug!(
            "[{}] 🏠 ✓ {}: {}/{} clusters produced viable candidates",
            self.tag, config_key, viable, clusters
        );
    }

    pub fn log_generator_failure(&self, config_key: &str, error: &anyhow::Error) {
        warn!(
            "[{}] 🏠 ⚠️  Generator {} failed and was skipped: {:#}",
            self.tag, config_key, error
        );
    }

    /// Candidate counts grouped by density multiplier and by partition k.
    pub fn log_candidate_summary(&self, sources: &BTreeMap<String, usize>, sites_selected: usize) {
        let total: usize = sources.values().sum();
        info!("[{}] 🏠 📊 Candidate summary", self.tag);
        if total == 0 {
            info!("[{}] 🏠    no viable candidates generated", self.tag);
            return;
        }
        let pct = |count: usize| 100.0 * count as f64 / total as f64;

        let mut eps_groups: BTreeMap<String, usize> = BTreeMap::new();
        let mut k_groups: BTreeMap<usize, usize> = BTreeMap::new();
        let mut baseline = 0;
        for (key, count) in sources {
            if key == "original_dbscan" {
                baseline += count;
            } else if let Some(rest) = key.strip_prefix("dbscan_eps") {
                let eps = rest.split('_').next().unwrap_or(rest).to_string();
                *eps_groups.entry(eps).or_insert(0) += count;
            } else if let Some(rest) = key.strip_prefix("kmeans_k") {
                if let Some(k) = rest.split('_').next().and_then(|k| k.parse::<usize>().ok()) {
                    *k_groups.entry(k).or_insert(0) += count;
                }
            }
        }

        let density_total = baseline + eps_groups.values().sum::<usize>();
        if density_total > 0 {
            info!("[{}] 🏠 🔍 Density: {} candidates ({:.1}%)", self.tag, density_total, pct(density_total));
            if baseline > 0 {
                info!("[{}] 🏠      baseline: {:4} ({:4.1}%)", self.tag, baseline, pct(baseline));
            }
            for (eps, count) in &eps_groups {
                info!("[{}] 🏠      eps={}: {:4} ({:4.1}%)", self.tag, eps, count, pct(*count));
            }
        }
        let partition_total: usize = k_groups.values().sum();
        if partition_total > 0 {
            info!("[{}] 🏠 🎯 Partition: {} candidates ({:.1}%)", self.tag, partition_total, pct(partition_total));
            for (k, count) in &k_groups {
                info!("[{}] 🏠      k={}: {:4} ({:4.1}%)", self.tag, k, count, pct(*count));
            }
        }
        info!("[{}] 🏠 ✅ Total: {} candidates → {} selected", self.tag, total, sites_selected);
    }

    pub fn log_selection(&self, strategy: &str, sites: usize, total_coverage: usize) {
        info!(
            "[{}] 🏠 🎯 Best strategy: {} ({} sites, {} total coverage)",
            self.tag, strategy, sites, total_coverage
        );
    }

    pub fn log_completion(&self, stats: &CoverageStatistics) {
        info!(
            "[{}] 🏠 🎉 COMPLETED in {:.2?}: {} new sites, {:.1}% total coverage",
            self.tag,
            self.start_time.elapsed(),
            stats.sites_selected,
            stats.coverage_percentage
        );
        info!(
            "[{}] 🏠 📊 Results: {} new + {} existing = {}/{} buildings ({} people covered)",
            self.tag,
            stats.new_coverage,
            stats.existing_coverage,
            stats.total_coverage,
            stats.total_demand,
            stats.total_population_covered
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!("[{}] 🏠 ⚠️  {}", self.tag, message);
    }
}
