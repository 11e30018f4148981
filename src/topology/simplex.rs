//! Simplices and Filtrations
//!
//! A filtration is the ordered input of the persistence pipeline. The
//! position of a simplex in the filtration is its row and column index in
//! the boundary matrix, so the ordering must put every face strictly before
//! each of its cofaces.
//!
//! Validation happens once, when the filtration is constructed; everything
//! downstream assumes a well-formed filtration.

use ordered_float::OrderedFloat;
use serde::Serialize;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::ops::Index;

use crate::error::{PersistenceError, Result};

/// A simplex with its filtration value.
///
/// Two simplices are the same cell iff they have the same vertex set;
/// `PartialEq` and `Hash` ignore the value and the declared dimension.
#[derive(Debug, Clone, Serialize)]
pub struct Simplex {
    dim: usize,
    value: f64,
    /// Sorted, without duplicates
    vertices: Vec<usize>,
}

impl Simplex {
    /// Create a simplex with an explicit dimension.
    ///
    /// The dimension is checked against the vertex count when the simplex
    /// is placed in a [`Filtration`].
    pub fn new(dim: usize, value: f64, vertices: impl IntoIterator<Item = usize>) -> Self {
        let mut vertices: Vec<usize> = vertices.into_iter().collect();
        vertices.sort_unstable();
        vertices.dedup();
        Self { dim, value, vertices }
    }

    /// Create a simplex whose dimension is one less than its vertex count.
    pub fn from_vertices(vertices: impl IntoIterator<Item = usize>, value: f64) -> Self {
        let mut simplex = Self::new(0, value, vertices);
        simplex.dim = simplex.vertices.len().saturating_sub(1);
        simplex
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    /// True iff `self` is a codimension-1 face of `other`.
    pub fn is_face_of(&self, other: &Simplex) -> bool {
        other.dim == self.dim + 1 && is_subset(&self.vertices, &other.vertices)
    }

    /// Vertex sets of the codimension-1 faces, in lexicographic order
    /// reversed (the face dropping vertex 0 comes first). Empty for vertices.
    pub fn faces(&self) -> impl Iterator<Item = Vec<usize>> + '_ {
        let n = if self.vertices.len() > 1 { self.vertices.len() } else { 0 };
        (0..n).map(move |skip| {
            self.vertices
                .iter()
                .enumerate()
                .filter(|&(k, _)| k != skip)
                .map(|(_, &v)| v)
                .collect()
        })
    }
}

impl PartialEq for Simplex {
    fn eq(&self, other: &Self) -> bool {
        self.vertices == other.vertices
    }
}

impl Eq for Simplex {}

impl Hash for Simplex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.vertices.hash(state);
    }
}

/// Subset test on sorted vertex lists.
fn is_subset(small: &[usize], large: &[usize]) -> bool {
    if small.len() > large.len() {
        return false;
    }
    let mut rest = large.iter();
    small.iter().all(|v| rest.any(|w| w == v))
}

/// Ordered, validated sequence of simplices.
#[derive(Debug, Clone, Default)]
pub struct Filtration {
    simplices: Vec<Simplex>,
    /// Vertex set -> filtration index
    index: HashMap<Vec<usize>, usize>,
}

impl Filtration {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Take the simplices in the given order and validate it.
    pub fn new(simplices: Vec<Simplex>) -> Result<Self> {
        let mut index = HashMap::with_capacity(simplices.len());

        for (i, s) in simplices.iter().enumerate() {
            if s.vertices.is_empty() {
                return Err(PersistenceError::EmptySimplex { index: i });
            }
            if s.vertices.len() != s.dim + 1 {
                return Err(PersistenceError::DimensionMismatch {
                    index: i,
                    dim: s.dim,
                    vertices: s.vertices.len(),
                });
            }
            if !s.value.is_finite() {
                return Err(PersistenceError::NonFiniteValue { index: i, value: s.value });
            }
            if let Some(previous) = i.checked_sub(1).map(|k| simplices[k].value) {
                if s.value < previous {
                    return Err(PersistenceError::ValueOrder {
                        index: i,
                        value: s.value,
                        previous,
                    });
                }
            }
            if let Some(&first) = index.get(&s.vertices) {
                return Err(PersistenceError::DuplicateSimplex {
                    index: i,
                    first,
                    vertices: s.vertices.clone(),
                });
            }
            index.insert(s.vertices.clone(), i);
        }

        for (i, s) in simplices.iter().enumerate() {
            for face in s.faces() {
                let face_index = match index.get(&face) {
                    Some(&k) => k,
                    None => return Err(PersistenceError::MissingFace { index: i, face }),
                };
                if face_index >= i {
                    return Err(PersistenceError::FaceAfterCoface {
                        index: i,
                        face_index,
                        face,
                    });
                }
            }
        }

        Ok(Self { simplices, index })
    }

    /// Sort by (value, dimension, vertices) and validate.
    ///
    /// Dimension precedes the vertex tuple so that a face with the same
    /// value as its coface always lands first.
    pub fn sorted(mut simplices: Vec<Simplex>) -> Result<Self> {
        simplices.sort_by(|a, b| {
            OrderedFloat(a.value)
                .cmp(&OrderedFloat(b.value))
                .then(a.dim.cmp(&b.dim))
                .then_with(|| a.vertices.cmp(&b.vertices))
        });
        Self::new(simplices)
    }

    pub fn len(&self) -> usize {
        self.simplices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.simplices.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&Simplex> {
        self.simplices.get(i)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Simplex> {
        self.simplices.iter()
    }

    pub fn simplices(&self) -> &[Simplex] {
        &self.simplices
    }

    /// Filtration index of the simplex with this vertex set.
    pub fn index_of(&self, vertices: &[usize]) -> Option<usize> {
        let mut key = vertices.to_vec();
        key.sort_unstable();
        key.dedup();
        self.position(&key)
    }

    /// Index lookup for a vertex list that is already sorted and deduplicated.
    pub(crate) fn position(&self, sorted_vertices: &[usize]) -> Option<usize> {
        self.index.get(sorted_vertices).copied()
    }

    /// Largest simplex dimension, `None` when empty.
    pub fn max_dimension(&self) -> Option<usize> {
        self.simplices.iter().map(Simplex::dim).max()
    }
}

impl Index<usize> for Filtration {
    type Output = Simplex;

    fn index(&self, i: usize) -> &Simplex {
        &self.simplices[i]
    }
}

impl<'a> IntoIterator for &'a Filtration {
    type Item = &'a Simplex;
    type IntoIter = std::slice::Iter<'a, Simplex>;

    fn into_iter(self) -> Self::IntoIter {
        self.simplices.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_boundary() -> Vec<Simplex> {
        vec![
            Simplex::new(0, 0.0, [0]),
            Simplex::new(0, 0.0, [1]),
            Simplex::new(0, 0.0, [2]),
            Simplex::new(1, 1.0, [0, 1]),
            Simplex::new(1, 1.0, [1, 2]),
            Simplex::new(1, 1.0, [0, 2]),
        ]
    }

    #[test]
    fn test_vertices_are_normalized() {
        let s = Simplex::new(2, 0.5, [3, 1, 2, 1]);
        assert_eq!(s.vertices(), &[1, 2, 3]);
        assert_eq!(Simplex::from_vertices([4, 2], 0.0).dim(), 1);
    }

    #[test]
    fn test_equality_is_by_vertex_set() {
        let a = Simplex::new(1, 0.0, [0, 1]);
        let b = Simplex::new(1, 7.5, [1, 0]);
        assert_eq!(a, b);
        assert_ne!(a, Simplex::new(1, 0.0, [0, 2]));
    }

    #[test]
    fn test_face_relation_is_subset_containment() {
        let edge = Simplex::from_vertices([1, 3], 0.0);
        let tri = Simplex::from_vertices([1, 2, 3], 0.0);
        let other = Simplex::from_vertices([2, 3, 4], 0.0);
        assert!(edge.is_face_of(&tri));
        assert!(!edge.is_face_of(&other));
        // {0, 5} compares greater than {1, 3} as a tuple but is not a superset
        let v = Simplex::from_vertices([5], 0.0);
        assert!(!v.is_face_of(&edge));
        assert!(!tri.is_face_of(&edge));
    }

    #[test]
    fn test_faces() {
        let tri = Simplex::from_vertices([0, 1, 2], 0.0);
        let faces: Vec<_> = tri.faces().collect();
        assert_eq!(faces, vec![vec![1, 2], vec![0, 2], vec![0, 1]]);
        assert_eq!(Simplex::from_vertices([7], 0.0).faces().count(), 0);
    }

    #[test]
    fn test_valid_filtration() {
        let f = Filtration::new(triangle_boundary()).unwrap();
        assert_eq!(f.len(), 6);
        assert_eq!(f.index_of(&[2, 0]), Some(5));
        assert_eq!(f.max_dimension(), Some(1));
        assert!(Filtration::new(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_coface_before_face() {
        // Equal values, so only the index order is wrong
        let simplices = vec![
            Simplex::new(0, 0.0, [0]),
            Simplex::new(1, 0.0, [0, 1]),
            Simplex::new(0, 0.0, [1]),
        ];
        let err = Filtration::new(simplices).unwrap_err();
        assert!(matches!(err, PersistenceError::FaceAfterCoface { index: 1, face_index: 2, .. }));
    }

    #[test]
    fn test_rejects_missing_face() {
        let simplices = vec![Simplex::new(0, 0.0, [0]), Simplex::new(1, 1.0, [0, 1])];
        let err = Filtration::new(simplices).unwrap_err();
        assert_eq!(err, PersistenceError::MissingFace { index: 1, face: vec![0] });
    }

    #[test]
    fn test_rejects_dimension_mismatch() {
        let simplices = vec![Simplex::new(1, 0.0, [0])];
        let err = Filtration::new(simplices).unwrap_err();
        assert_eq!(err, PersistenceError::DimensionMismatch { index: 0, dim: 1, vertices: 1 });
    }

    #[test]
    fn test_rejects_duplicates_and_bad_values() {
        let dup = vec![Simplex::new(0, 0.0, [0]), Simplex::new(0, 1.0, [0])];
        assert!(matches!(
            Filtration::new(dup),
            Err(PersistenceError::DuplicateSimplex { index: 1, first: 0, .. })
        ));

        let nan = vec![Simplex::new(0, f64::NAN, [0])];
        assert!(matches!(
            Filtration::new(nan),
            Err(PersistenceError::NonFiniteValue { index: 0, .. })
        ));

        let empty = vec![Simplex::from_vertices(Vec::new(), 0.0)];
        assert_eq!(
            Filtration::new(empty).unwrap_err(),
            PersistenceError::EmptySimplex { index: 0 }
        );
    }

    #[test]
    fn test_rejects_face_entering_later_than_coface() {
        let simplices = vec![
            Simplex::new(0, 0.0, [0]),
            Simplex::new(0, 2.0, [1]),
            Simplex::new(1, 1.0, [0, 1]),
        ];
        assert_eq!(
            Filtration::new(simplices).unwrap_err(),
            PersistenceError::ValueOrder { index: 2, value: 1.0, previous: 2.0 }
        );
    }

    #[test]
    fn test_rejects_decreasing_values() {
        // Every face precedes its cofaces, but v2 and e02 step back down
        let simplices = vec![
            Simplex::new(0, 0.0, [0]),
            Simplex::new(0, 5.0, [1]),
            Simplex::new(0, 0.0, [2]),
            Simplex::new(1, 5.0, [1, 2]),
            Simplex::new(1, 1.0, [0, 2]),
        ];
        assert_eq!(
            Filtration::new(simplices).unwrap_err(),
            PersistenceError::ValueOrder { index: 2, value: 0.0, previous: 5.0 }
        );

        // Equal values are allowed
        let ties = vec![
            Simplex::new(0, 1.0, [0]),
            Simplex::new(0, 1.0, [1]),
            Simplex::new(1, 1.0, [0, 1]),
        ];
        assert!(Filtration::new(ties).is_ok());
    }

    #[test]
    fn test_sorted_puts_faces_first() {
        let simplices = vec![
            Simplex::new(1, 1.0, [0, 2]),
            Simplex::new(2, 1.0, [0, 1, 2]),
            Simplex::new(1, 1.0, [0, 1]),
            Simplex::new(0, 0.0, [2]),
            Simplex::new(1, 1.0, [1, 2]),
            Simplex::new(0, 0.0, [0]),
            Simplex::new(0, 0.0, [1]),
        ];
        let f = Filtration::sorted(simplices).unwrap();
        let order: Vec<&[usize]> = f.iter().map(Simplex::vertices).collect();
        assert_eq!(
            order,
            vec![&[0][..], &[1], &[2], &[0, 1], &[0, 2], &[1, 2], &[0, 1, 2]]
        );
    }
}
