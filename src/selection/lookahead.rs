// src/selection/lookahead.rs

use crate::models::candidates::CandidateSite;
use crate::selection::{conflicts, coverage_order};

/// Greedy with a short lookahead: among the `width` highest-coverage remaining
/// candidates, picks the one maximizing
/// `coverage + bonus * mean(coverage of the next `future_window` remaining
/// candidates it does not conflict with)`.
pub fn lookahead_selection(
    candidates: &[CandidateSite],
    min_separation: f64,
    target: usize,
    width: usize,
    future_window: usize,
    bonus: f64,
) -> Vec<usize> {
    let mut available = coverage_order(candidates);
    let mut selected = Vec::new();
    let window = future_window.max(1);

    while selected.len() < target && !available.is_empty() {
        let mut best: Option<(usize, f64)> = None;
        for pos in 0..width.max(1).min(available.len()) {
            let candidate = &candidates[available[pos]];
            let future: usize = available[pos + 1..]
                .iter()
                .filter(|&&other| !conflicts(candidate, &candidates[other], min_separation))
                .take(window)
                .map(|&other| candidates[other].buildings_covered)
                .sum();
            let score = candidate.buildings_covered as f64 + bonus * future as f64 / window as f64;
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((pos, score));
            }
        }

        let Some((pos, _)) = best else {
            break;
        };
        let chosen = available.remove(pos);
        selected.push(chosen);
        available.retain(|&i| !conflicts(&candidates[i], &candidates[chosen], min_separation));
    }
    selected
}
