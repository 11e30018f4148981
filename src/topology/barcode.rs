//! Barcodes from Reduced Boundary Matrices
//!
//! A reduced column `j` with `low(j) = i` pairs the simplex `i` (which
//! created a class) with the simplex `j` (which killed it). A simplex that is
//! neither a pivot row nor a nonzero column creates a class that is never
//! killed: an essential bar with infinite death.
//!
//! Every filtration index is the endpoint of exactly one bar, so
//! `2 * #finite + #essential = n`.

use ordered_float::OrderedFloat;
use serde::Serialize;
use std::fmt;

use super::boundary::BoundaryMatrix;
use super::simplex::Filtration;
use crate::error::{PersistenceError, Result};

/// A persistence interval `[birth, death)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bar {
    pub dimension: usize,
    pub birth: f64,
    /// `f64::INFINITY` for essential classes
    pub death: f64,
    /// Filtration index of the simplex that created the class
    pub birth_index: usize,
    /// Filtration index of the simplex that killed it
    pub death_index: Option<usize>,
}

impl Bar {
    pub fn persistence(&self) -> f64 {
        if self.death.is_infinite() {
            f64::INFINITY
        } else {
            self.death - self.birth
        }
    }

    pub fn is_essential(&self) -> bool {
        self.death.is_infinite()
    }

    /// Alive at `value`, i.e. `birth <= value < death`.
    pub fn contains(&self, value: f64) -> bool {
        self.birth <= value && value < self.death
    }

    fn sort_key(&self) -> (usize, OrderedFloat<f64>, OrderedFloat<f64>, usize) {
        (
            self.dimension,
            OrderedFloat(self.birth),
            OrderedFloat(self.death),
            self.birth_index,
        )
    }
}

/// Bars sorted by (dimension, birth, death).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Barcode {
    bars: Vec<Bar>,
}

impl Barcode {
    pub fn new() -> Self {
        Self { bars: Vec::new() }
    }

    /// Read the pairing off a reduced matrix.
    ///
    /// The matrix must come from `filtration` and must already be reduced.
    /// Two columns sharing a low row are reported as `ReductionInvariant`.
    pub fn from_reduced(matrix: &BoundaryMatrix, filtration: &Filtration) -> Result<Self> {
        let n = matrix.size();
        if n != filtration.len() {
            return Err(PersistenceError::SizeMismatch {
                matrix: n,
                filtration: filtration.len(),
            });
        }
        if let Some((row, first, second)) = matrix.find_shared_pivot() {
            return Err(PersistenceError::ReductionInvariant { row, first, second });
        }

        let mut bars = Vec::with_capacity(n);
        let mut paired = vec![false; n];

        for j in 0..n {
            if let Some(i) = matrix.low(j) {
                let birth = &filtration[i];
                bars.push(Bar {
                    dimension: birth.dim(),
                    birth: birth.value(),
                    death: filtration[j].value(),
                    birth_index: i,
                    death_index: Some(j),
                });
                paired[i] = true;
                paired[j] = true;
            }
        }

        for (i, simplex) in filtration.iter().enumerate() {
            if !paired[i] {
                bars.push(Bar {
                    dimension: simplex.dim(),
                    birth: simplex.value(),
                    death: f64::INFINITY,
                    birth_index: i,
                    death_index: None,
                });
            }
        }

        Ok(Self::from_bars(bars))
    }

    /// Collect bars and sort them.
    pub fn from_bars(mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(Bar::sort_key);
        Self { bars }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bar> {
        self.bars.iter()
    }

    /// Get bars for dimension d
    pub fn dim(&self, d: usize) -> Vec<&Bar> {
        self.bars.iter().filter(|b| b.dimension == d).collect()
    }

    /// Get finite bars for dimension d
    pub fn finite(&self, d: usize) -> Vec<&Bar> {
        self.bars
            .iter()
            .filter(|b| b.dimension == d && !b.is_essential())
            .collect()
    }

    /// Get essential bars for dimension d
    pub fn essential(&self, d: usize) -> Vec<&Bar> {
        self.bars
            .iter()
            .filter(|b| b.dimension == d && b.is_essential())
            .collect()
    }

    /// Number of finite bars in dimension d
    pub fn count(&self, d: usize) -> usize {
        self.finite(d).len()
    }

    pub fn finite_count(&self) -> usize {
        self.bars.iter().filter(|b| !b.is_essential()).count()
    }

    pub fn essential_count(&self) -> usize {
        self.bars.iter().filter(|b| b.is_essential()).count()
    }

    pub fn max_dimension(&self) -> Option<usize> {
        self.bars.iter().map(|b| b.dimension).max()
    }

    /// Betti numbers of the final complex: essential bars per dimension.
    pub fn betti_numbers(&self) -> Vec<usize> {
        self.betti_counts(|b| b.is_essential())
    }

    /// Betti numbers of the subcomplex present at `value`.
    pub fn betti_at(&self, value: f64) -> Vec<usize> {
        self.betti_counts(|b| b.contains(value))
    }

    fn betti_counts(&self, alive: impl Fn(&Bar) -> bool) -> Vec<usize> {
        let Some(top) = self.max_dimension() else {
            return Vec::new();
        };
        let mut betti = vec![0; top + 1];
        for bar in self.bars.iter().filter(|&b| alive(b)) {
            betti[bar.dimension] += 1;
        }
        betti
    }

    /// Drop bars whose death equals their birth.
    pub fn nontrivial(&self) -> Self {
        Self {
            bars: self
                .bars
                .iter()
                .filter(|b| b.persistence() > 0.0)
                .copied()
                .collect(),
        }
    }

    /// Persistence entropy of the finite bars in dimension d
    pub fn persistence_entropy(&self, d: usize) -> f64 {
        let lifetimes: Vec<f64> = self
            .finite(d)
            .iter()
            .map(|b| b.persistence())
            .filter(|&p| p > 0.0)
            .collect();

        let total: f64 = lifetimes.iter().sum();
        if total <= 0.0 {
            return 0.0;
        }

        let mut entropy = 0.0;
        for p in lifetimes {
            let prob = p / total;
            entropy -= prob * prob.ln();
        }
        entropy
    }

    /// Total persistence of the finite bars in dimension d
    pub fn total_persistence(&self, d: usize) -> f64 {
        self.finite(d).iter().map(|b| b.persistence()).sum()
    }
}

impl<'a> IntoIterator for &'a Barcode {
    type Item = &'a Bar;
    type IntoIter = std::slice::Iter<'a, Bar>;

    fn into_iter(self) -> Self::IntoIter {
        self.bars.iter()
    }
}

/// One bar per line: `dimension birth death`, with `inf` for essential bars.
impl fmt::Display for Barcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bar in &self.bars {
            writeln!(f, "{} {} {}", bar.dimension, bar.birth, bar.death)?;
        }
        Ok(())
    }
}
