//! Dense four-index tensor in chemists' notation.
//!
//! Storage is an `norb² × norb²` matrix: row `p*norb + q`, column `r*norb + s`.
//! This is the layout the sigma-vector GEMM consumes directly, so the folded
//! Hamiltonian, electron-repulsion integrals and the two-particle density all
//! share it.

extern crate nalgebra as na;

use crate::error::FciError;
use na::DMatrix;
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, PartialEq)]
pub struct Tensor4 {
    norb: usize,
    data: DMatrix<f64>,
}

impl Tensor4 {
    pub fn zeros(norb: usize) -> Self {
        let npair = norb * norb;
        Tensor4 {
            norb,
            data: DMatrix::zeros(npair, npair),
        }
    }

    /// Build a tensor element by element: `f(p, q, r, s)`.
    pub fn from_fn<F>(norb: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize, usize, usize) -> f64,
    {
        let npair = norb * norb;
        let data = DMatrix::from_fn(npair, npair, |pq, rs| {
            f(pq / norb, pq % norb, rs / norb, rs % norb)
        });
        Tensor4 { norb, data }
    }

    /// Wrap a pair-indexed `norb² × norb²` matrix.
    pub fn from_matrix(norb: usize, data: DMatrix<f64>) -> Result<Self, FciError> {
        let npair = norb * norb;
        if data.nrows() != npair || data.ncols() != npair {
            return Err(FciError::shape(
                "pair-indexed tensor",
                format!("{npair}x{npair}"),
                format!("{}x{}", data.nrows(), data.ncols()),
            ));
        }
        Ok(Tensor4 { norb, data })
    }

    pub fn norb(&self) -> usize {
        self.norb
    }

    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.data
    }

    pub fn as_matrix_mut(&mut self) -> &mut DMatrix<f64> {
        &mut self.data
    }

    pub fn into_matrix(self) -> DMatrix<f64> {
        self.data
    }

    /// Full contraction `Σ_pqrs self[p,q,r,s] * other[p,q,r,s]`.
    pub fn dot(&self, other: &Tensor4) -> f64 {
        self.data.dot(&other.data)
    }

    pub fn scale_mut(&mut self, fac: f64) {
        self.data *= fac;
    }

    /// Swap the first two indices: `out[q,p,r,s] = self[p,q,r,s]`.
    pub fn transpose_bra(&self) -> Tensor4 {
        let n = self.norb;
        Tensor4::from_fn(n, |p, q, r, s| self[(q, p, r, s)])
    }

    /// Largest absolute deviation from the 8-fold permutational symmetry of
    /// real electron-repulsion integrals.
    pub fn max_symmetry_deviation(&self) -> f64 {
        let n = self.norb;
        let mut dev: f64 = 0.0;
        for p in 0..n {
            for q in 0..n {
                for r in 0..n {
                    for s in 0..n {
                        let v = self[(p, q, r, s)];
                        dev = dev
                            .max((v - self[(q, p, r, s)]).abs())
                            .max((v - self[(p, q, s, r)]).abs())
                            .max((v - self[(r, s, p, q)]).abs());
                    }
                }
            }
        }
        dev
    }

    pub(crate) fn check_norb(&self, norb: usize, what: &'static str) -> Result<(), FciError> {
        if self.norb != norb {
            return Err(FciError::shape(
                what,
                format!("{norb}^4"),
                format!("{}^4", self.norb),
            ));
        }
        Ok(())
    }
}

impl Index<(usize, usize, usize, usize)> for Tensor4 {
    type Output = f64;

    #[inline]
    fn index(&self, (p, q, r, s): (usize, usize, usize, usize)) -> &f64 {
        &self.data[(p * self.norb + q, r * self.norb + s)]
    }
}

impl IndexMut<(usize, usize, usize, usize)> for Tensor4 {
    #[inline]
    fn index_mut(&mut self, (p, q, r, s): (usize, usize, usize, usize)) -> &mut f64 {
        let n = self.norb;
        &mut self.data[(p * n + q, r * n + s)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_layout() {
        let t = Tensor4::from_fn(3, |p, q, r, s| (1000 * p + 100 * q + 10 * r + s) as f64);
        assert_eq!(t[(2, 1, 0, 2)], 2102.0);
        assert_eq!(t.as_matrix()[(2 * 3 + 1, 2)], 2102.0);
    }

    #[test]
    fn test_transpose_bra() {
        let t = Tensor4::from_fn(2, |p, q, r, s| (8 * p + 4 * q + 2 * r + s) as f64);
        let u = t.transpose_bra();
        assert_eq!(u[(1, 0, 1, 1)], t[(0, 1, 1, 1)]);
        assert_eq!(u[(0, 1, 0, 1)], t[(1, 0, 0, 1)]);
    }

    #[test]
    fn test_from_matrix_rejects_wrong_shape() {
        let err = Tensor4::from_matrix(2, DMatrix::zeros(3, 4)).unwrap_err();
        assert!(matches!(err, FciError::ShapeMismatch { .. }));
    }
}
