// src/clustering/partition.rs - k-means partitioning with k-means++ seeding
//!
//! Each (k, seed) run is reproducible: all randomness comes from a `StdRng`
//! seeded by the caller, and several initializations are tried with the
//! lowest within-group squared distance kept.

use anyhow::{bail, Result};
use log::debug;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::geo::Point;

/// Converged assignments are detected when no point changes group, or when
/// total centroid movement falls below this (squared degrees).
const CENTROID_SHIFT_TOLERANCE: f64 = 1e-18;

#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    pub centroids: Vec<Point>,
    pub assignments: Vec<usize>,
    /// Sum of squared distances from each point to its centroid.
    pub inertia: f64,
    pub iterations: usize,
}

impl Partition {
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.centroids.len()];
        for &a in &self.assignments {
            sizes[a] += 1;
        }
        sizes
    }
}

/// Partitions `points` into `k` groups. Fails when `k` is zero or exceeds the
/// number of points.
pub fn kmeans(
    points: &[Point],
    k: usize,
    n_init: usize,
    max_iterations: usize,
    seed: u64,
) -> Result<Partition> {
    if k == 0 {
        bail!("k-means requires k >= 1");
    }
    if points.len() < k {
        bail!(
            "k-means with k={} needs at least {} points, only {} available",
            k,
            k,
            points.len()
        );
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut best: Option<Partition> = None;
    for init in 0..n_init.max(1) {
        let centroids = kmeans_plus_plus_init(points, k, &mut rng);
        let run = lloyd(points, centroids, max_iterations.max(1));
        debug!(
            "k-means k={} seed={} init {}: inertia {:.3e} after {} iterations",
            k, seed, init, run.inertia, run.iterations
        );
        if best.as_ref().map_or(true, |b| run.inertia < b.inertia) {
            best = Some(run);
        }
    }
    match best {
        Some(partition) => Ok(partition),
        None => bail!("k-means produced no partition for k={}", k),
    }
}

/// First centroid uniform, the rest drawn with probability proportional to the
/// squared distance to the nearest centroid chosen so far.
fn kmeans_plus_plus_init(points: &[Point], k: usize, rng: &mut StdRng) -> Vec<Point> {
    let n = points.len();
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.gen_range(0..n)]);

    let mut min_d2: Vec<f64> = points
        .iter()
        .map(|p| p.distance_squared(&centroids[0]))
        .collect();

    while centroids.len() < k {
        let next = match WeightedIndex::new(&min_d2) {
            Ok(dist) => dist.sample(rng),
            // Every point already sits on a centroid.
            Err(_) => rng.gen_range(0..n),
        };
        let c = points[next];
        centroids.push(c);
        for (d, p) in min_d2.iter_mut().zip(points) {
            let nd = p.distance_squared(&c);
            if nd < *d {
                *d = nd;
            }
        }
    }
    centroids
}

fn nearest_centroid(p: &Point, centroids: &[Point]) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (i, c) in centroids.iter().enumerate() {
        let d = p.distance_squared(c);
        if d < best.1 {
            best = (i, d);
        }
    }
    best
}

fn lloyd(points: &[Point], mut centroids: Vec<Point>, max_iterations: usize) -> Partition {
    let k = centroids.len();
    let mut assignments = vec![usize::MAX; points.len()];
    let mut iterations = 0;

    for _ in 0..max_iterations {
        iterations += 1;
        let mut changed = false;
        let mut distances = Vec::with_capacity(points.len());
        for (i, p) in points.iter().enumerate() {
            let (c, d) = nearest_centroid(p, &centroids);
            if assignments[i] != c {
                assignments[i] = c;
                changed = true;
            }
            distances.push(d);
        }

        let mut sums = vec![(0.0f64, 0.0f64); k];
        let mut counts = vec![0usize; k];
        for (p, &a) in points.iter().zip(&assignments) {
            sums[a].0 += p.lat;
            sums[a].1 += p.lon;
            counts[a] += 1;
        }

        // Empty groups take over the point farthest from its current centroid.
        for c in 0..k {
            if counts[c] > 0 {
                continue;
            }
            let far = distances
                .iter()
                .enumerate()
                .filter(|(i, _)| counts[assignments[*i]] > 1)
                .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
                .map(|(i, _)| i);
            if let Some(i) = far {
                let old = assignments[i];
                sums[old].0 -= points[i].lat;
                sums[old].1 -= points[i].lon;
                counts[old] -= 1;
                assignments[i] = c;
                sums[c] = (points[i].lat, points[i].lon);
                counts[c] = 1;
                distances[i] = 0.0;
                changed = true;
            }
        }

        let mut shift = 0.0;
        for c in 0..k {
            if counts[c] == 0 {
                continue;
            }
            let n = counts[c] as f64;
            let updated = Point::new(sums[c].0 / n, sums[c].1 / n);
            shift += updated.distance_squared(&centroids[c]);
            centroids[c] = updated;
        }

        if !changed || shift <= CENTROID_SHIFT_TOLERANCE {
            break;
        }
    }

    // Final assignment against the settled centroids.
    let mut inertia = 0.0;
    for (i, p) in points.iter().enumerate() {
        let (c, d) = nearest_centroid(p, &centroids);
        assignments[i] = c;
        inertia += d;
    }

    Partition {
        centroids,
        assignments,
        inertia,
        iterations,
    }
}
