// src/selection/weighted_random.rs

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::models::candidates::CandidateSite;
use crate::selection::{conflicts, indices_coverage};

/// Best of `trials` randomized constructions, trial `t` seeded with `seed + t`.
pub fn weighted_random_selection(
    candidates: &[CandidateSite],
    min_separation: f64,
    target: usize,
    seed: u64,
    trials: usize,
) -> Vec<usize> {
    let mut best: Option<(Vec<usize>, usize)> = None;
    for trial in 0..trials {
        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(trial as u64));
        let picked = weighted_random_construction(candidates, min_separation, target, &mut rng);
        let coverage = indices_coverage(candidates, &picked);
        if best.as_ref().map_or(true, |(_, c)| coverage > *c) {
            best = Some((picked, coverage));
        }
    }
    best.map(|(picked, _)| picked).unwrap_or_default()
}

/// Draws the next site with probability proportional to coverage squared and
/// drops every remaining candidate that conflicts with it.
fn weighted_random_construction(
    candidates: &[CandidateSite],
    min_separation: f64,
    target: usize,
    rng: &mut StdRng,
) -> Vec<usize> {
    let mut available: Vec<usize> = (0..candidates.len()).collect();
    let mut selected = Vec::new();
    while selected.len() < target && !available.is_empty() {
        let weights: Vec<f64> = available
            .iter()
            .map(|&i| {
                let c = candidates[i].buildings_covered as f64;
                c * c
            })
            .collect();
        let Ok(dist) = WeightedIndex::new(&weights) else {
            // Only zero-coverage candidates left.
            break;
        };
        let chosen = available[dist.sample(rng)];
        selected.push(chosen);
        available.retain(|&i| i != chosen && !conflicts(&candidates[i], &candidates[chosen], min_separation));
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidates::is_pairwise_separated;
    use crate::selection::test_support::site;

    fn grid() -> Vec<CandidateSite> {
        (0..30)
            .map(|i| site((i % 6) as f64 * 0.001, (i / 6) as f64 * 0.001, 2 + (i * 7) % 13))
            .collect()
    }

    #[test]
    fn test_same_seed_same_selection() {
        let candidates = grid();
        let a = weighted_random_selection(&candidates, 0.002, 5, 42, 5);
        let b = weighted_random_selection(&candidates, 0.002, 5, 42, 5);
        assert_eq!(a, b);
    }

    #[test]
    fn test_selection_is_separated_and_bounded() {
        let candidates = grid();
        for seed in 0..5 {
            let picked = weighted_random_selection(&candidates, 0.002, 4, seed, 3);
            assert!(picked.len() <= 4);
            let sites: Vec<CandidateSite> = picked.iter().map(|&i| candidates[i].clone()).collect();
            assert!(is_pairwise_separated(&sites, 0.002));
        }
    }

    #[test]
    fn test_zero_separation_never_repeats_a_site() {
        let candidates = vec![site(0.0, 0.0, 5), site(0.0, 0.0, 6)];
        let mut picked = weighted_random_selection(&candidates, 0.0, 5, 1, 1);
        picked.sort_unstable();
        assert_eq!(picked, vec![0, 1]);
    }

    #[test]
    fn test_zero_coverage_candidates_are_never_drawn() {
        let candidates = vec![site(0.0, 0.0, 0), site(1.0, 1.0, 0)];
        assert!(weighted_random_selection(&candidates, 0.002, 2, 7, 2).is_empty());
        assert!(weighted_random_selection(&candidates, 0.002, 2, 7, 0).is_empty());
    }
}
