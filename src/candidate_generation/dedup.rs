// src/candidate_generation/dedup.rs

use log::debug;
use std::collections::HashMap;

use crate::models::candidates::CandidateSite;

/// Keeps the highest-coverage candidate of every locality: candidates are
/// visited by descending `buildings_covered` (stable, so pool order breaks
/// ties) and accepted only when no accepted candidate lies strictly closer
/// than `min_distance_deg`. Accepted candidates are bucketed on a grid of
/// `min_distance_deg` cells, so only the 3x3 neighborhood is checked.
pub fn deduplicate_candidates(
    mut candidates: Vec<CandidateSite>,
    min_distance_deg: f64,
) -> Vec<CandidateSite> {
    let total = candidates.len();
    candidates.sort_by(|a, b| b.buildings_covered.cmp(&a.buildings_covered));
    if !(min_distance_deg.is_finite() && min_distance_deg > 0.0) {
        return candidates;
    }

    let min_distance_sq = min_distance_deg * min_distance_deg;
    let cell_of = |c: &CandidateSite| {
        (
            (c.lat / min_distance_deg).floor() as i64,
            (c.lon / min_distance_deg).floor() as i64,
        )
    };

    let mut buckets: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
    let mut accepted: Vec<CandidateSite> = Vec::with_capacity(total);
    for candidate in candidates {
        let (cx, cy) = cell_of(&candidate);
        let point = candidate.point();
        let conflict = (-1..=1).any(|dx| {
            (-1..=1).any(|dy| {
                buckets.get(&(cx + dx, cy + dy)).map_or(false, |ids| {
                    ids.iter()
                        .any(|&id| accepted[id].point().distance_squared(&point) < min_distance_sq)
                })
            })
        });
        if !conflict {
            buckets.entry((cx, cy)).or_default().push(accepted.len());
            accepted.push(candidate);
        }
    }

    debug!(
        "Deduplication at {:.6} deg kept {}/{} candidates",
        min_distance_deg,
        accepted.len(),
        total
    );
    accepted
}
