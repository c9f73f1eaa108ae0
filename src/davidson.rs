//! Preconditioned Davidson solver for the lowest eigenpair of a real
//! symmetric operator that is only available through matrix-vector products.
//!
//! Each cycle:
//! 1. orthonormalize the correction vector against the search space
//! 2. project the operator onto the space and diagonalize the small matrix
//! 3. form the Ritz pair `(e, x)` and residual `r = Ax - e x`
//! 4. stop when `|Δe| < tol` and `|r| < sqrt(tol)`, else precondition `r`
//!
//! When the space reaches `max_space` it collapses onto the current Ritz vector.

extern crate nalgebra as na;

use crate::error::FciError;
use na::{DMatrix, DVector};
use tracing::{debug, warn};

/// Result of an eigensolver run.
#[derive(Debug, Clone)]
pub struct Eigenpair {
    pub value: f64,
    pub vector: DVector<f64>,
    pub converged: bool,
    pub cycles: usize,
}

/// Iterative solver for the lowest eigenpair.
///
/// `matvec(x)` returns `A x`. `precond(r, e)` returns an approximation to
/// `(A - e)⁻¹ r`.
pub trait Eigensolver {
    fn lowest<M, P>(&self, matvec: M, x0: DVector<f64>, precond: P) -> Result<Eigenpair, FciError>
    where
        M: Fn(&DVector<f64>) -> DVector<f64>,
        P: Fn(&DVector<f64>, f64) -> DVector<f64>;
}

#[derive(Debug, Clone, Copy)]
pub struct Davidson {
    /// Energy change threshold; the residual threshold is its square root
    pub tol: f64,
    pub max_cycle: usize,
    pub max_space: usize,
    /// Squared norm below which a new direction is considered dependent
    pub lindep: f64,
}

impl Default for Davidson {
    fn default() -> Self {
        Davidson {
            tol: 1e-12,
            max_cycle: 100,
            max_space: 16,
            lindep: 1e-14,
        }
    }
}

impl Davidson {
    pub fn new(tol: f64, max_cycle: usize) -> Self {
        Davidson {
            tol,
            max_cycle,
            ..Self::default()
        }
    }

    pub fn with_max_space(mut self, max_space: usize) -> Self {
        self.max_space = max_space.max(2);
        self
    }
}

impl Eigensolver for Davidson {
    fn lowest<M, P>(&self, matvec: M, x0: DVector<f64>, precond: P) -> Result<Eigenpair, FciError>
    where
        M: Fn(&DVector<f64>) -> DVector<f64>,
        P: Fn(&DVector<f64>, f64) -> DVector<f64>,
    {
        let dim = x0.len();
        let norm = x0.norm();
        if !(norm > 0.0 && norm.is_finite()) {
            return Err(FciError::EmptySubspace);
        }
        let toloose = self.tol.sqrt();

        let mut basis: Vec<DVector<f64>> = Vec::with_capacity(self.max_space);
        let mut sigma: Vec<DVector<f64>> = Vec::with_capacity(self.max_space);
        let mut xt = x0 / norm;
        let mut x = xt.clone();
        let mut e = 0.0;
        let mut e_prev = f64::INFINITY;
        let mut rnorm = f64::INFINITY;
        let mut converged = false;
        let mut cycles = 0;

        while cycles < self.max_cycle {
            let xt_norm = xt.norm();
            if !(xt_norm > 0.0) {
                debug!("Davidson: zero correction vector at cycle {}", cycles);
                converged = rnorm < toloose;
                break;
            }
            xt /= xt_norm;
            // two passes of classical Gram-Schmidt
            for _ in 0..2 {
                for b in &basis {
                    let ov = b.dot(&xt);
                    xt.axpy(-ov, b, 1.0);
                }
            }
            let xt_norm = xt.norm();
            if xt_norm * xt_norm < self.lindep {
                debug!("Davidson: linear dependence in search space at cycle {}", cycles);
                converged = rnorm < toloose;
                break;
            }
            xt /= xt_norm;

            let axt = matvec(&xt);
            if axt.len() != dim {
                return Err(FciError::shape("matvec output", dim, axt.len()));
            }
            basis.push(xt);
            sigma.push(axt);
            cycles += 1;

            let m = basis.len();
            let heff = DMatrix::from_fn(m, m, |i, j| {
                0.5 * (basis[i].dot(&sigma[j]) + basis[j].dot(&sigma[i]))
            });
            let eig = heff.symmetric_eigen();
            let (idx, &value) = eig
                .eigenvalues
                .iter()
                .enumerate()
                .min_by(|a, b| a.1.total_cmp(b.1))
                .ok_or(FciError::EmptySubspace)?;
            let v = eig.eigenvectors.column(idx);

            x = DVector::zeros(dim);
            let mut ax = DVector::zeros(dim);
            for (k, (b, s)) in basis.iter().zip(sigma.iter()).enumerate() {
                x.axpy(v[k], b, 1.0);
                ax.axpy(v[k], s, 1.0);
            }
            e = value;
            let r = &ax - &x * e;
            rnorm = r.norm();
            let de = e - e_prev;
            e_prev = e;
            debug!(
                "Davidson cycle {:3}: e = {:.14} de = {:.3e} |r| = {:.3e} space = {}",
                cycles, e, de, rnorm, m
            );

            if de.abs() < self.tol && rnorm < toloose {
                converged = true;
                break;
            }

            xt = precond(&r, e);
            if basis.len() >= self.max_space {
                debug!("Davidson: collapsing search space onto Ritz vector");
                let xn = x.norm();
                basis.clear();
                sigma.clear();
                basis.push(&x / xn);
                sigma.push(ax / xn);
            }
        }

        if !converged {
            warn!(
                "Davidson did not converge in {} cycles (|r| = {:.3e})",
                cycles, rnorm
            );
        }

        Ok(Eigenpair {
            value: e,
            vector: x,
            converged,
            cycles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn test_matrix(n: usize) -> DMatrix<f64> {
        DMatrix::from_fn(n, n, |i, j| {
            if i == j {
                (i as f64) * 0.5 - 1.0
            } else {
                0.05 * (((i * 7 + j * 7) % 11) as f64 - 5.0) / (1.0 + (i as f64 - j as f64).abs())
            }
        })
    }

    fn solve(a: &DMatrix<f64>, solver: Davidson) -> Eigenpair {
        let diag = a.diagonal();
        let mut x0 = DVector::zeros(a.nrows());
        x0[0] = 1.0;
        solver
            .lowest(
                |x| a * x,
                x0,
                |r, e| r.zip_map(&diag, |ri, di| ri / (di - e + 1e-4)),
            )
            .unwrap()
    }

    #[test]
    fn test_lowest_eigenvalue_matches_dense_solver() {
        let a = test_matrix(40);
        let exact = a.clone().symmetric_eigen().eigenvalues.min();

        let pair = solve(&a, Davidson::default());
        assert!(pair.converged);
        assert_relative_eq!(pair.value, exact, epsilon = 1e-10);
        assert_relative_eq!(pair.vector.norm(), 1.0, epsilon = 1e-10);
        let residual = &a * &pair.vector - &pair.vector * pair.value;
        assert!(residual.norm() < 1e-5);
    }

    #[test]
    fn test_small_space_restarts_still_converge() {
        let a = test_matrix(30);
        let exact = a.clone().symmetric_eigen().eigenvalues.min();

        let pair = solve(&a, Davidson::new(1e-12, 200).with_max_space(4));
        assert!(pair.converged);
        assert_relative_eq!(pair.value, exact, epsilon = 1e-10);
    }

    #[test]
    fn test_exact_guess_converges_immediately() {
        let a = DMatrix::from_diagonal(&DVector::from_vec(vec![-2.0, 1.0, 3.0]));
        let pair = solve(&a, Davidson::default());
        assert!(pair.converged);
        assert_eq!(pair.value, -2.0);
        assert!(pair.cycles <= 2);
    }

    #[test]
    fn test_zero_guess_is_rejected() {
        let a = test_matrix(3);
        let err = Davidson::default()
            .lowest(|x| &a * x, DVector::zeros(3), |r, _| r.clone())
            .unwrap_err();
        assert_eq!(err, FciError::EmptySubspace);
    }
}
