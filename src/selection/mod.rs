// src/selection/mod.rs - Maximum-coverage site selection under a separation constraint
//!
//! Every strategy works on indices into a deduplicated candidate slice and
//! returns at most `target` indices whose sites are pairwise at least
//! `min_separation` apart. `select_sites` runs the enabled strategies and keeps
//! the highest total coverage.

pub mod greedy;
pub mod local_search;
pub mod lookahead;
pub mod weighted_random;

use log::debug;
use std::fmt;

use crate::models::candidates::{is_pairwise_separated, total_coverage, CandidateSite};
use crate::utils::optimizer_config::SelectionConfig;

pub use greedy::greedy_selection;
pub use local_search::local_search_selection;
pub use lookahead::lookahead_selection;
pub use weighted_random::weighted_random_selection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionStrategy {
    Greedy,
    LocalSearch,
    WeightedRandom,
    Lookahead,
}

impl SelectionStrategy {
    pub fn all() -> [SelectionStrategy; 4] {
        [
            SelectionStrategy::Greedy,
            SelectionStrategy::LocalSearch,
            SelectionStrategy::WeightedRandom,
            SelectionStrategy::Lookahead,
        ]
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "greedy" => Some(SelectionStrategy::Greedy),
            "local_search" | "iterative" => Some(SelectionStrategy::LocalSearch),
            "weighted_random" | "random" => Some(SelectionStrategy::WeightedRandom),
            "lookahead" => Some(SelectionStrategy::Lookahead),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SelectionStrategy::Greedy => "greedy",
            SelectionStrategy::LocalSearch => "local_search",
            SelectionStrategy::WeightedRandom => "weighted_random",
            SelectionStrategy::Lookahead => "lookahead",
        }
    }
}

impl fmt::Display for SelectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Label used when the candidate set is returned as-is.
pub const ALL_CANDIDATES: &str = "all_candidates";

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionOutcome {
    pub sites: Vec<CandidateSite>,
    pub strategy: String,
    pub total_coverage: usize,
}

/// Two sites conflict when strictly closer than the minimum separation.
pub(crate) fn conflicts(a: &CandidateSite, b: &CandidateSite, min_separation: f64) -> bool {
    a.point().distance_squared(&b.point()) < min_separation * min_separation
}

/// Candidate indices by descending coverage; equal coverage keeps slice order.
pub(crate) fn coverage_order(candidates: &[CandidateSite]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by(|&a, &b| candidates[b].buildings_covered.cmp(&candidates[a].buildings_covered));
    order
}

pub(crate) fn indices_coverage(candidates: &[CandidateSite], indices: &[usize]) -> usize {
    indices.iter().map(|&i| candidates[i].buildings_covered).sum()
}

/// Picks at most `target` pairwise-separated candidates maximizing total
/// coverage. When the whole set already fits and is separated it is returned
/// without running any heuristic. Ties between strategies go to the one
/// evaluated first.
pub fn select_sites(
    candidates: &[CandidateSite],
    target: usize,
    min_separation: f64,
    config: &SelectionConfig,
) -> SelectionOutcome {
    if target == 0 || candidates.is_empty() {
        return SelectionOutcome {
            sites: Vec::new(),
            strategy: ALL_CANDIDATES.to_string(),
            total_coverage: 0,
        };
    }
    if candidates.len() <= target && is_pairwise_separated(candidates, min_separation) {
        return SelectionOutcome {
            sites: candidates.to_vec(),
            strategy: ALL_CANDIDATES.to_string(),
            total_coverage: total_coverage(candidates),
        };
    }

    let mut greedy_cache: Option<Vec<usize>> = None;
    let mut best: Option<(SelectionStrategy, Vec<usize>, usize)> = None;

    for strategy in &config.strategies {
        let picked = match strategy {
            SelectionStrategy::Greedy => greedy_cache
                .get_or_insert_with(|| greedy_selection(candidates, min_separation, target))
                .clone(),
            SelectionStrategy::LocalSearch => {
                let initial = greedy_cache
                    .get_or_insert_with(|| greedy_selection(candidates, min_separation, target))
                    .clone();
                local_search_selection(
                    candidates,
                    min_separation,
                    initial,
                    config.local_search_max_passes,
                )
            }
            SelectionStrategy::WeightedRandom => weighted_random_selection(
                candidates,
                min_separation,
                target,
                config.seed,
                config.random_trials,
            ),
            SelectionStrategy::Lookahead => lookahead_selection(
                candidates,
                min_separation,
                target,
                config.lookahead_width,
                config.lookahead_future_window,
                config.lookahead_bonus,
            ),
        };
        let coverage = indices_coverage(candidates, &picked);
        debug!(
            "Selection strategy {}: {} sites, {} total coverage",
            strategy,
            picked.len(),
            coverage
        );
        if best.as_ref().map_or(true, |(_, _, c)| coverage > *c) {
            best = Some((*strategy, picked, coverage));
        }
    }

    match best {
        Some((strategy, indices, total)) => SelectionOutcome {
            sites: indices.iter().map(|&i| candidates[i].clone()).collect(),
            strategy: strategy.name().to_string(),
            total_coverage: total,
        },
        None => SelectionOutcome {
            sites: Vec::new(),
            strategy: ALL_CANDIDATES.to_string(),
            total_coverage: 0,
        },
    }
}
