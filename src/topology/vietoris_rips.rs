//! Vietoris-Rips Filtrations
//!
//! The Vietoris-Rips complex VR_ε(X) is a simplicial complex where:
//! - 0-simplices are the points in X
//! - A k-simplex [v₀, ..., vₖ] exists iff d(vᵢ, vⱼ) ≤ ε for all i,j
//!
//! Each simplex enters the filtration at its diameter: vertices at 0, edges
//! at their length, higher simplices at their longest edge.

use ndarray::Array2;
use std::collections::HashSet;

use super::simplex::{Filtration, Simplex};
use crate::error::{PersistenceError, Result};

/// Vietoris-Rips filtration builder
#[derive(Debug, Clone)]
pub struct VietorisRips {
    /// Distance matrix (precomputed)
    distances: Array2<f64>,
    /// Maximum filtration value
    max_epsilon: f64,
}

impl VietorisRips {
    /// Create from a precomputed distance matrix
    pub fn from_distance_matrix(distances: &Array2<f64>, max_epsilon: f64) -> Result<Self> {
        let n = distances.nrows();
        if distances.ncols() != n {
            return Err(PersistenceError::InvalidDistanceMatrix {
                reason: format!("expected a square matrix, got {} x {}", n, distances.ncols()),
            });
        }
        for i in 0..n {
            let dii = distances[[i, i]];
            if dii != 0.0 {
                return Err(PersistenceError::InvalidDistanceMatrix {
                    reason: format!("diagonal entry ({i}, {i}) = {dii} is not zero"),
                });
            }
            for j in i + 1..n {
                let (dij, dji) = (distances[[i, j]], distances[[j, i]]);
                if dij.is_nan() || dij < 0.0 || dij != dji {
                    return Err(PersistenceError::InvalidDistanceMatrix {
                        reason: format!("entries ({i}, {j}) = {dij} and ({j}, {i}) = {dji}"),
                    });
                }
            }
        }
        Ok(Self {
            distances: distances.clone(),
            max_epsilon,
        })
    }

    /// Create from point cloud (one point per row, computes distance matrix)
    pub fn from_points(points: &Array2<f64>, max_epsilon: f64) -> Self {
        Self {
            distances: Self::compute_distance_matrix(points),
            max_epsilon,
        }
    }

    /// Compute Euclidean distance matrix
    fn compute_distance_matrix(points: &Array2<f64>) -> Array2<f64> {
        let n = points.nrows();
        let dim = points.ncols();

        let mut dm = Array2::<f64>::zeros((n, n));

        for i in 0..n {
            for j in i + 1..n {
                let mut dist_sq = 0.0;
                for d in 0..dim {
                    let diff = points[[i, d]] - points[[j, d]];
                    dist_sq += diff * diff;
                }
                let dist = dist_sq.sqrt();
                dm[[i, j]] = dist;
                dm[[j, i]] = dist;
            }
        }

        dm
    }

    /// Number of points
    pub fn n_points(&self) -> usize {
        self.distances.nrows()
    }

    pub fn max_epsilon(&self) -> f64 {
        self.max_epsilon
    }

    pub fn distances(&self) -> &Array2<f64> {
        &self.distances
    }

    /// All simplices up to dimension `max_dim` with diameter ≤ max_epsilon,
    /// in filtration order.
    pub fn filtration(&self, max_dim: usize) -> Result<Filtration> {
        let n = self.n_points();
        let mut simplices: Vec<Simplex> = (0..n).map(|i| Simplex::new(0, 0.0, [i])).collect();

        // Grow cliques one vertex at a time, appending only larger vertex ids
        let mut frontier: Vec<(Vec<usize>, f64)> = (0..n).map(|i| (vec![i], 0.0)).collect();
        for _ in 0..max_dim {
            let mut next = Vec::new();
            for (vertices, diameter) in &frontier {
                let last = vertices[vertices.len() - 1];
                for v in last + 1..n {
                    let reach = vertices
                        .iter()
                        .map(|&u| self.distances[[u, v]])
                        .fold(*diameter, f64::max);
                    if reach <= self.max_epsilon {
                        let mut grown = vertices.clone();
                        grown.push(v);
                        next.push((grown, reach));
                    }
                }
            }
            simplices.extend(next.iter().map(|(vertices, diameter)| {
                Simplex::from_vertices(vertices.iter().copied(), *diameter)
            }));
            frontier = next;
        }

        Filtration::sorted(simplices)
    }

    /// Count connected components at scale `epsilon` using Union-Find
    pub fn count_components_at(&self, epsilon: f64) -> usize {
        let n = self.n_points();
        let mut parent: Vec<usize> = (0..n).collect();
        let mut rank = vec![0usize; n];

        fn find(parent: &mut [usize], i: usize) -> usize {
            if parent[i] != i {
                parent[i] = find(parent, parent[i]);
            }
            parent[i]
        }

        fn union(parent: &mut [usize], rank: &mut [usize], x: usize, y: usize) {
            let rx = find(parent, x);
            let ry = find(parent, y);
            if rx != ry {
                if rank[rx] < rank[ry] {
                    parent[rx] = ry;
                } else if rank[rx] > rank[ry] {
                    parent[ry] = rx;
                } else {
                    parent[ry] = rx;
                    rank[rx] += 1;
                }
            }
        }

        for i in 0..n {
            for j in i + 1..n {
                if self.distances[[i, j]] <= epsilon {
                    union(&mut parent, &mut rank, i, j);
                }
            }
        }

        // Count unique roots
        let mut roots = HashSet::new();
        for i in 0..n {
            roots.insert(find(&mut parent, i));
        }
        roots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::persistence::compute_barcode;
    use ndarray::array;

    #[test]
    fn test_two_points() {
        let dm = array![[0.0, 1.0], [1.0, 0.0]];
        let vr = VietorisRips::from_distance_matrix(&dm, 2.0).unwrap();
        let f = vr.filtration(1).unwrap();
        assert_eq!(f.len(), 3);

        let barcode = compute_barcode(&f).unwrap();
        let finite_h0 = barcode.finite(0);
        assert_eq!(finite_h0.len(), 1);
        assert!((finite_h0[0].birth - 0.0).abs() < 1e-10);
        assert!((finite_h0[0].death - 1.0).abs() < 1e-10);
        assert_eq!(barcode.essential(0).len(), 1);
    }

    #[test]
    fn test_square_cycle() {
        // Square: cycle born at 1, filled when diagonals appear at sqrt(2)
        let s2 = 2.0_f64.sqrt();
        let dm = array![
            [0.0, 1.0, s2, 1.0],
            [1.0, 0.0, 1.0, s2],
            [s2, 1.0, 0.0, 1.0],
            [1.0, s2, 1.0, 0.0]
        ];

        let vr = VietorisRips::from_distance_matrix(&dm, 2.0).unwrap();
        let barcode = compute_barcode(&vr.filtration(2).unwrap()).unwrap().nontrivial();

        let h1 = barcode.finite(1);
        assert_eq!(h1.len(), 1, "Square should have one H1 cycle");
        assert!((h1[0].birth - 1.0).abs() < 1e-10, "Cycle born at 1");
        assert!((h1[0].death - s2).abs() < 1e-10, "Cycle dies at sqrt(2)");
        assert_eq!(barcode.betti_numbers()[0], 1);
    }

    #[test]
    fn test_max_epsilon_truncates() {
        let points = array![[0.0, 0.0], [1.0, 0.0], [0.5, 0.866]];
        let vr = VietorisRips::from_points(&points, 0.5);
        let f = vr.filtration(2).unwrap();
        // No edge is short enough: three isolated vertices
        assert_eq!(f.len(), 3);
        assert_eq!(compute_barcode(&f).unwrap().betti_numbers(), vec![3]);
    }

    #[test]
    fn test_components_match_h0() {
        let points = array![[0.0, 0.0], [1.0, 0.0], [0.5, 0.866], [5.0, 5.0]];
        let vr = VietorisRips::from_points(&points, 10.0);
        let barcode = compute_barcode(&vr.filtration(1).unwrap()).unwrap();

        for eps in [0.5, 1.0, 2.0, 8.0] {
            assert_eq!(barcode.betti_at(eps)[0], vr.count_components_at(eps), "eps = {eps}");
        }
    }

    #[test]
    fn test_rejects_asymmetric_matrix() {
        let dm = array![[0.0, 1.0], [2.0, 0.0]];
        assert!(matches!(
            VietorisRips::from_distance_matrix(&dm, 1.0),
            Err(PersistenceError::InvalidDistanceMatrix { .. })
        ));
        let dm = Array2::<f64>::zeros((2, 3));
        assert!(VietorisRips::from_distance_matrix(&dm, 1.0).is_err());
    }

    #[test]
    fn test_rejects_nonzero_diagonal() {
        let dm = array![[0.0, 1.0], [1.0, 0.5]];
        assert_eq!(
            VietorisRips::from_distance_matrix(&dm, 1.0).unwrap_err(),
            PersistenceError::InvalidDistanceMatrix {
                reason: "diagonal entry (1, 1) = 0.5 is not zero".to_string(),
            }
        );
        let dm = array![[f64::NAN, 1.0], [1.0, 0.0]];
        assert!(VietorisRips::from_distance_matrix(&dm, 1.0).is_err());
    }
}
