// src/clustering/density.rs - Density-based clustering (DBSCAN) over degree space

use anyhow::{bail, Result};
use log::debug;
use petgraph::unionfind::UnionFind;
use std::collections::HashMap;

use crate::geometry::GridIndex;
use crate::models::geo::Point;

/// Cluster labels for every input point; `None` marks noise.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityClustering {
    pub labels: Vec<Option<usize>>,
    pub n_clusters: usize,
}

impl DensityClustering {
    /// Member indices per cluster, clusters in label order, members ascending.
    pub fn members(&self) -> Vec<Vec<usize>> {
        let mut members = vec![Vec::new(); self.n_clusters];
        for (idx, label) in self.labels.iter().enumerate() {
            if let Some(c) = label {
                members[*c].push(idx);
            }
        }
        members
    }

    pub fn noise_count(&self) -> usize {
        self.labels.iter().filter(|l| l.is_none()).count()
    }
}

/// A point is core when at least `min_samples` points (itself included) lie
/// within `eps`. Core points reachable through chains of core neighbors share
/// a cluster; a non-core point within `eps` of a core point joins the cluster
/// of its lowest-index core neighbor; everything else is noise.
pub fn dbscan(points: &[Point], eps: f64, min_samples: usize) -> Result<DensityClustering> {
    if !(eps.is_finite() && eps > 0.0) {
        bail!("DBSCAN eps must be positive and finite, got {}", eps);
    }
    if min_samples == 0 {
        bail!("DBSCAN min_samples must be >= 1");
    }
    let n = points.len();
    if n == 0 {
        return Ok(DensityClustering {
            labels: Vec::new(),
            n_clusters: 0,
        });
    }

    let index = GridIndex::build(points, eps);
    let is_core: Vec<bool> = points
        .iter()
        .map(|p| index.count_within(p, eps) >= min_samples)
        .collect();

    let mut components = UnionFind::<usize>::new(n);
    let mut border_anchor: Vec<Option<usize>> = vec![None; n];
    for (i, p) in points.iter().enumerate() {
        if is_core[i] {
            index.for_each_within(p, eps, |j| {
                if j > i && is_core[j] {
                    components.union(i, j);
                }
            });
        } else {
            let mut anchor: Option<usize> = None;
            index.for_each_within(p, eps, |j| {
                if is_core[j] && anchor.map_or(true, |a| j < a) {
                    anchor = Some(j);
                }
            });
            border_anchor[i] = anchor;
        }
    }

    // Cluster ids follow the lowest core index of each component.
    let mut root_to_label: HashMap<usize, usize> = HashMap::new();
    let mut labels: Vec<Option<usize>> = vec![None; n];
    for i in 0..n {
        if is_core[i] {
            let root = components.find_mut(i);
            let next = root_to_label.len();
            labels[i] = Some(*root_to_label.entry(root).or_insert(next));
        }
    }
    for i in 0..n {
        if let Some(anchor) = border_anchor[i] {
            labels[i] = labels[anchor];
        }
    }

    let clustering = DensityClustering {
        labels,
        n_clusters: root_to_label.len(),
    };
    debug!(
        "DBSCAN eps={:.6} min_samples={}: {} clusters, {} noise points",
        eps,
        min_samples,
        clustering.n_clusters,
        clustering.noise_count()
    );
    Ok(clustering)
}
