// src/selection/local_search.rs

use log::debug;

use crate::models::candidates::CandidateSite;
use crate::selection::{conflicts, coverage_order};

/// Swap-based improvement of `initial`: replaces one selected site with an
/// unselected, non-conflicting candidate whenever that strictly raises total
/// coverage. Each pass restarts after its first improving swap; the search
/// ends on a pass without one or after `max_passes`.
pub fn local_search_selection(
    candidates: &[CandidateSite],
    min_separation: f64,
    initial: Vec<usize>,
    max_passes: usize,
) -> Vec<usize> {
    let mut current = initial;
    if current.is_empty() {
        return current;
    }
    let order = coverage_order(candidates);
    let mut in_selection = vec![false; candidates.len()];
    for &i in &current {
        in_selection[i] = true;
    }

    let mut passes = 0;
    let mut improved = true;
    while improved && passes < max_passes {
        improved = false;
        passes += 1;

        'positions: for pos in 0..current.len() {
            let outgoing = current[pos];
            for &candidate in &order {
                // Order is by descending coverage, so nothing later can improve.
                if candidates[candidate].buildings_covered <= candidates[outgoing].buildings_covered {
                    break;
                }
                if in_selection[candidate] {
                    continue;
                }
                let clashes = current.iter().enumerate().any(|(other_pos, &other)| {
                    other_pos != pos && conflicts(&candidates[candidate], &candidates[other], min_separation)
                });
                if !clashes {
                    in_selection[outgoing] = false;
                    in_selection[candidate] = true;
                    current[pos] = candidate;
                    improved = true;
                    break 'positions;
                }
            }
        }
    }

    debug!("Local search finished after {} passes", passes);
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidates::is_pairwise_separated;
    use crate::selection::greedy::greedy_selection;
    use crate::selection::indices_coverage;
    use crate::selection::test_support::site;

    #[test]
    fn test_swaps_in_a_better_non_conflicting_site() {
        // Selection [0, 1]; candidate 2 clashes only with 0 and covers more than it.
        let candidates = vec![
            site(0.0, 0.0, 10),
            site(0.0, 0.01, 12),
            site(0.0, 0.001, 11),
        ];
        let improved = local_search_selection(&candidates, 0.002, vec![0, 1], 50);
        assert_eq!(improved, vec![2, 1]);
    }

    #[test]
    fn test_never_introduces_a_conflict() {
        let candidates = vec![site(0.0, 0.0, 20), site(0.0, 0.001, 15)];
        let greedy = greedy_selection(&candidates, 0.002, 2);
        assert_eq!(greedy, vec![0]);
        let improved = local_search_selection(&candidates, 0.002, greedy, 50);
        assert_eq!(improved, vec![0]);
    }

    #[test]
    fn test_never_decreases_coverage() {
        let candidates: Vec<CandidateSite> = (0..40)
            .map(|i| site((i % 8) as f64 * 0.0013, (i / 8) as f64 * 0.0013, 3 + (i * 11) % 19))
            .collect();
        let greedy = greedy_selection(&candidates, 0.002, 6);
        let before = indices_coverage(&candidates, &greedy);
        let improved = local_search_selection(&candidates, 0.002, greedy, 50);
        let sites: Vec<CandidateSite> = improved.iter().map(|&i| candidates[i].clone()).collect();
        assert!(indices_coverage(&candidates, &improved) >= before);
        assert!(is_pairwise_separated(&sites, 0.002));
    }

    #[test]
    fn test_zero_passes_returns_initial() {
        let candidates = vec![site(0.0, 0.0, 10), site(0.0, 0.001, 11)];
        assert_eq!(local_search_selection(&candidates, 0.002, vec![0], 0), vec![0]);
    }
}
