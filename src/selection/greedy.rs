// src/selection/greedy.rs

use crate::models::candidates::CandidateSite;
use crate::selection::{conflicts, coverage_order};

/// Accepts candidates by descending coverage unless they conflict with one
/// already accepted; stops at `target`.
pub fn greedy_selection(candidates: &[CandidateSite], min_separation: f64, target: usize) -> Vec<usize> {
    let mut selected: Vec<usize> = Vec::with_capacity(target.min(candidates.len()));
    for idx in coverage_order(candidates) {
        if selected.len() >= target {
            break;
        }
        let candidate = &candidates[idx];
        if selected
            .iter()
            .all(|&s| !conflicts(candidate, &candidates[s], min_separation))
        {
            selected.push(idx);
        }
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::test_support::site;

    #[test]
    fn test_picks_by_coverage_and_skips_conflicts() {
        let candidates = vec![
            site(0.0, 0.0, 10),
            site(0.0, 0.001, 25),
            site(0.0, 0.01, 12),
            site(0.0, 0.0105, 11),
        ];
        assert_eq!(greedy_selection(&candidates, 0.002, 5), vec![1, 2]);
    }

    #[test]
    fn test_stops_at_target() {
        let candidates: Vec<CandidateSite> = (0..5).map(|i| site(0.0, i as f64, 10 + i)).collect();
        assert_eq!(greedy_selection(&candidates, 0.002, 2), vec![4, 3]);
    }

    #[test]
    fn test_exact_separation_is_allowed() {
        let candidates = vec![site(0.0, 0.0, 10), site(0.0, 0.5, 9)];
        assert_eq!(greedy_selection(&candidates, 0.5, 2), vec![0, 1]);
    }
}
