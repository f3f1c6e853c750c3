// src/geometry/grid_index.rs

use std::collections::HashMap;

use crate::models::geo::Point;

/// Spatial bucket hash over a fixed point set. Radius queries only scan the
/// buckets overlapping the query circle.
#[derive(Debug, Clone)]
pub struct GridIndex<'a> {
    points: &'a [Point],
    cell_size: f64,
    cells: HashMap<(i64, i64), Vec<usize>>,
}

impl<'a> GridIndex<'a> {
    /// `cell_size` should be on the order of the typical query radius.
    pub fn build(points: &'a [Point], cell_size: f64) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            1.0
        };
        let mut cells: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
        for (idx, p) in points.iter().enumerate() {
            cells.entry(cell_of(p, cell_size)).or_default().push(idx);
        }
        Self {
            points,
            cell_size,
            cells,
        }
    }

    /// Calls `f` with the index of every point whose squared distance to
    /// `center` is <= radius². Buckets are visited in a fixed order.
    pub fn for_each_within<F: FnMut(usize)>(&self, center: &Point, radius: f64, mut f: F) {
        if self.points.is_empty() || !(radius >= 0.0) {
            return;
        }
        let radius_sq = radius * radius;
        let span = (radius / self.cell_size).ceil() as i64;
        let (cx, cy) = cell_of(center, self.cell_size);
        for dx in -span..=span {
            for dy in -span..=span {
                // Cells past the i64 range would repeat the saturated edge cell.
                let (Some(x), Some(y)) = (cx.checked_add(dx), cy.checked_add(dy)) else {
                    continue;
                };
                if let Some(bucket) = self.cells.get(&(x, y)) {
                    for &idx in bucket {
                        if self.points[idx].distance_squared(center) <= radius_sq {
                            f(idx);
                        }
                    }
                }
            }
        }
    }

    /// Indices within `radius` of `center`, ascending.
    pub fn indices_within(&self, center: &Point, radius: f64) -> Vec<usize> {
        let mut out = Vec::new();
        self.for_each_within(center, radius, |idx| out.push(idx));
        out.sort_unstable();
        out
    }

    pub fn count_within(&self, center: &Point, radius: f64) -> usize {
        let mut count = 0;
        self.for_each_within(center, radius, |_| count += 1);
        count
    }
}

fn cell_of(p: &Point, cell_size: f64) -> (i64, i64) {
    ((p.lat / cell_size).floor() as i64, (p.lon / cell_size).floor() as i64)
}
