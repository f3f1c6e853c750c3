// src/coverage/coverage_filter.rs

use log::debug;

use crate::geometry::GridIndex;
use crate::models::geo::Point;

/// Demand left uncovered by the active facilities.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidualDemand {
    /// Uncovered points, in original order.
    pub points: Vec<Point>,
    /// Position of each residual point in the original demand array.
    pub original_indices: Vec<usize>,
    /// `covered[i]` is true when original demand point `i` is already served.
    pub covered: Vec<bool>,
}

impl ResidualDemand {
    pub fn already_covered(&self) -> usize {
        self.covered.len() - self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Union of the coverage discs of `sites` over `demand`.
pub fn coverage_mask(demand: &[Point], sites: &[Point], radius_deg: f64) -> Vec<bool> {
    let mut mask = vec![false; demand.len()];
    if demand.is_empty() || sites.is_empty() {
        return mask;
    }
    let index = GridIndex::build(demand, radius_deg);
    for site in sites {
        index.for_each_within(site, radius_deg, |idx| mask[idx] = true);
    }
    mask
}

/// Removes demand points within `radius_deg` of any facility. With no
/// facilities the full demand set comes back unchanged.
pub fn filter_existing_coverage(
    demand: &[Point],
    facilities: &[Point],
    radius_deg: f64,
) -> ResidualDemand {
    let covered = coverage_mask(demand, facilities, radius_deg);
    let (points, original_indices): (Vec<Point>, Vec<usize>) = demand
        .iter()
        .enumerate()
        .filter(|(idx, _)| !covered[*idx])
        .map(|(idx, p)| (*p, idx))
        .unzip();

    debug!(
        "Existing coverage filter: {} facilities, {}/{} demand points still uncovered",
        facilities.len(),
        points.len(),
        demand.len()
    );

    ResidualDemand {
        points,
        original_indices,
        covered,
    }
}

/// Per-site count of demand points within the radius (overlaps counted for each site).
pub fn count_covered_per_site(sites: &[Point], demand: &[Point], radius_deg: f64) -> Vec<usize> {
    let scorer = CoverageScorer::new(demand, radius_deg);
    sites.iter().map(|s| scorer.score(s)).collect()
}

/// Counts demand points a prospective site would cover.
#[derive(Debug, Clone)]
pub struct CoverageScorer<'a> {
    index: GridIndex<'a>,
    radius_deg: f64,
}

impl<'a> CoverageScorer<'a> {
    pub fn new(demand: &'a [Point], radius_deg: f64) -> Self {
        Self {
            index: GridIndex::build(demand, radius_deg),
            radius_deg,
        }
    }

    pub fn score(&self, site: &Point) -> usize {
        self.index.count_within(site, self.radius_deg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize, step: f64) -> Vec<Point> {
        (0..n).map(|i| Point::new(0.0, i as f64 * step)).collect()
    }

    #[test]
    fn test_no_facilities_returns_full_demand() {
        let demand = line(10, 0.001);
        let residual = filter_existing_coverage(&demand, &[], 0.002);
        assert_eq!(residual.points, demand);
        assert_eq!(residual.original_indices, (0..10).collect::<Vec<_>>());
        assert_eq!(residual.already_covered(), 0);
    }

    #[test]
    fn test_covered_points_never_reach_residual() {
        let demand = line(10, 0.001);
        let facilities = vec![Point::new(0.0, 0.0), Point::new(0.0, 0.009)];
        let radius = 0.0015;
        let residual = filter_existing_coverage(&demand, &facilities, radius);

        // 0,1 covered by the first facility, 8,9 by the second.
        assert_eq!(residual.original_indices, vec![2, 3, 4, 5, 6, 7]);
        assert_eq!(residual.already_covered(), 4);
        for p in &residual.points {
            for f in &facilities {
                assert!(p.distance_squared(f) > radius * radius);
            }
        }
        let covered_set: Vec<usize> = (0..10).filter(|i| residual.covered[*i]).collect();
        assert_eq!(covered_set, vec![0, 1, 8, 9]);
    }

    #[test]
    fn test_count_covered_per_site_counts_overlaps() {
        let demand = line(5, 0.001);
        let sites = vec![Point::new(0.0, 0.001), Point::new(0.0, 0.002)];
        assert_eq!(count_covered_per_site(&sites, &demand, 0.0011), vec![3, 3]);
    }

    #[test]
    fn test_scorer_on_empty_demand() {
        let demand: Vec<Point> = Vec::new();
        let scorer = CoverageScorer::new(&demand, 0.001);
        assert_eq!(scorer.score(&Point::new(0.0, 0.0)), 0);
    }
}
