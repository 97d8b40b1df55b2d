//! Fixed-radius density clustering over lat/lon points.
//!
//! Core points have at least `min_samples` points (themselves included) within `eps`.
//! Clusters grow from core points in input order; a border point joins whichever cluster
//! reaches it first. Everything else is `Unclustered`.

use {
    crate::{
        config::DbscanParams,
        domain::{ClusterLabel, LatLon, ZoneId},
    },
    rayon::prelude::*,
    std::collections::HashMap,
};

/// Uniform grid with `eps`-sized cells, so a radius query only scans the 3x3 block around a point.
struct CellGrid {
    eps: f64,
    cells: HashMap<(i64, i64), Vec<usize>>,
}

impl CellGrid {
    fn build(points: &[LatLon], eps: f64) -> Self {
        let mut cells: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
        for (idx, p) in points.iter().enumerate() {
            cells.entry(Self::cell_of(p, eps)).or_default().push(idx);
        }
        Self { eps, cells }
    }

    #[inline]
    fn cell_of(p: &LatLon, eps: f64) -> (i64, i64) {
        ((p.lat / eps).floor() as i64, (p.lon / eps).floor() as i64)
    }

    /// Indices within `eps` of `points[idx]` (itself included), ascending.
    fn neighbours(&self, points: &[LatLon], idx: usize) -> Vec<usize> {
        let p = &points[idx];
        let (cx, cy) = Self::cell_of(p, self.eps);

        let mut found: Vec<usize> = (cx.saturating_sub(1)..=cx.saturating_add(1))
            .flat_map(|x| (cy.saturating_sub(1)..=cy.saturating_add(1)).map(move |y| (x, y)))
            .filter_map(|cell| self.cells.get(&cell))
            .flatten()
            .copied()
            .filter(|&j| p.distance_deg(&points[j]) <= self.eps)
            .collect();
        found.sort_unstable();
        found
    }
}

/// Labels every point. Output is index-aligned with `points`.
pub fn dbscan(points: &[LatLon], params: &DbscanParams) -> Vec<ClusterLabel> {
    if points.is_empty() || params.eps <= 0.0 {
        return vec![ClusterLabel::Unclustered; points.len()];
    }

    // 1. Radius queries (independent per point, so run them in parallel)
    let grid = CellGrid::build(points, params.eps);
    let neighbourhoods: Vec<Vec<usize>> = (0..points.len())
        .into_par_iter()
        .map(|i| grid.neighbours(points, i))
        .collect();

    let is_core: Vec<bool> = neighbourhoods
        .iter()
        .map(|n| n.len() >= params.min_samples)
        .collect();

    // 2. Expand clusters from unlabelled core points, in input order
    let mut labels = vec![ClusterLabel::Unclustered; points.len()];
    let mut next_id: u32 = 0;
    let mut stack: Vec<usize> = Vec::new();

    for seed in 0..points.len() {
        if labels[seed] != ClusterLabel::Unclustered || !is_core[seed] {
            continue;
        }

        let label = ClusterLabel::Zone(ZoneId::new(next_id));
        next_id += 1;

        stack.push(seed);
        while let Some(i) = stack.pop() {
            if labels[i] != ClusterLabel::Unclustered {
                continue;
            }
            labels[i] = label;
            if is_core[i] {
                stack.extend(
                    neighbourhoods[i]
                        .iter()
                        .copied()
                        .filter(|&j| labels[j] == ClusterLabel::Unclustered),
                );
            }
        }
    }

    log::info!(
        "dbscan(): {} points -> {} zones, {} unclustered (eps {}, min_samples {})",
        points.len(),
        next_id,
        labels.iter().filter(|l| **l == ClusterLabel::Unclustered).count(),
        params.eps,
        params.min_samples
    );

    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS: DbscanParams = DbscanParams {
        eps: 0.002,
        min_samples: 3,
    };

    fn blob(lat: f64, lon: f64, n: usize) -> Vec<LatLon> {
        (0..n)
            .map(|i| LatLon::new(lat + i as f64 * 0.0001, lon - i as f64 * 0.0001))
            .collect()
    }

    #[test]
    fn two_blobs_and_an_outlier() {
        let mut pts = blob(37.77, -122.45, 5);
        pts.extend(blob(37.80, -122.40, 4));
        pts.push(LatLon::new(38.5, -121.0));

        let labels = dbscan(&pts, &PARAMS);
        let zone = |id| ClusterLabel::Zone(ZoneId::new(id));

        assert!(labels[..5].iter().all(|l| *l == zone(0)));
        assert!(labels[5..9].iter().all(|l| *l == zone(1)));
        assert_eq!(labels[9], ClusterLabel::Unclustered);
    }

    #[test]
    fn fewer_points_than_min_samples_is_all_noise() {
        let pts = blob(37.77, -122.45, 2);
        let labels = dbscan(&pts, &PARAMS);
        assert!(labels.iter().all(|l| *l == ClusterLabel::Unclustered));
    }

    #[test]
    fn radius_is_inclusive() {
        // Three points exactly eps apart in a line: the middle one is core.
        let pts = vec![
            LatLon::new(0.0, 0.0),
            LatLon::new(0.0, 0.5),
            LatLon::new(0.0, 1.0),
        ];
        let params = DbscanParams {
            eps: 0.5,
            min_samples: 3,
        };
        let labels = dbscan(&pts, &params);
        assert!(labels.iter().all(|l| *l == ClusterLabel::Zone(ZoneId::new(0))));
    }

    #[test]
    fn border_point_joins_first_cluster_to_reach_it() {
        // Cores at lon 0.0 and lon 2.0; the point at lon 1.0 sees both but is not core itself.
        let pts: Vec<LatLon> = [-1.0, -0.5, 0.0, 1.0, 2.0, 2.5, 3.0]
            .iter()
            .map(|&lon| LatLon::new(0.0, lon))
            .collect();

        let params = DbscanParams {
            eps: 1.0,
            min_samples: 4,
        };
        let labels = dbscan(&pts, &params);
        assert_eq!(labels[3], ClusterLabel::Zone(ZoneId::new(0)));
        assert_eq!(labels[6], ClusterLabel::Zone(ZoneId::new(1)));
    }

    #[test]
    fn extreme_cells_do_not_overflow() {
        let mut pts = blob(37.77, -122.45, 4);
        pts.push(LatLon::new(f64::INFINITY, -122.45));
        pts.push(LatLon::new(37.77, f64::NEG_INFINITY));

        let labels = dbscan(&pts, &PARAMS);
        assert!(labels[..4].iter().all(|l| *l == ClusterLabel::Zone(ZoneId::new(0))));
        assert_eq!(labels[4], ClusterLabel::Unclustered);
        assert_eq!(labels[5], ClusterLabel::Unclustered);
    }

    #[test]
    fn labelling_is_independent_of_thread_scheduling() {
        let mut pts = blob(37.77, -122.45, 40);
        pts.extend(blob(37.79, -122.43, 40));
        let first = dbscan(&pts, &PARAMS);
        for _ in 0..5 {
            assert_eq!(dbscan(&pts, &PARAMS), first);
        }
    }
}
