//! FCI ground-state driver.
//!
//! Folds the Hamiltonian, builds the diagonal preconditioner and hands the
//! sigma-vector product to an [`Eigensolver`].

extern crate nalgebra as na;

use super::direct::{absorb_h1e, contract_2e_unchecked, make_hdiag, FciSpace, Nelec};
use super::rdm::{make_rdm1, make_rdm12};
use crate::cistring::{CachedStringIndexer, StringIndexer};
use crate::davidson::{Davidson, Eigensolver};
use crate::error::FciError;
use crate::tensor::Tensor4;
use na::{DMatrix, DVector};
use tracing::{info, warn};

/// Converged (or last) FCI eigenpair.
#[derive(Debug, Clone)]
pub struct FciSolution {
    /// Electronic energy, no nuclear repulsion
    pub energy: f64,
    /// Ground-state coefficients, shape `(Na, Nb)`
    pub civec: DMatrix<f64>,
    pub converged: bool,
    pub cycles: usize,
    pub space: FciSpace,
}

impl FciSolution {
    pub fn make_rdm1(&self) -> Result<DMatrix<f64>, FciError> {
        make_rdm1(&self.civec, &self.space)
    }

    pub fn make_rdm12(&self) -> Result<(DMatrix<f64>, Tensor4), FciError> {
        make_rdm12(&self.civec, &self.space)
    }
}

/// FCI solver with an injected string indexer and eigensolver.
pub struct FciSolver<S = CachedStringIndexer, E = Davidson> {
    pub indexer: S,
    pub eigensolver: E,

    /// Added to `hdiag - e` in the preconditioner denominator
    pub level_shift: f64,
}

impl Default for FciSolver {
    fn default() -> Self {
        FciSolver::new(CachedStringIndexer::new(), Davidson::default())
    }
}

impl<S: StringIndexer, E: Eigensolver> FciSolver<S, E> {
    pub fn new(indexer: S, eigensolver: E) -> Self {
        FciSolver {
            indexer,
            eigensolver,
            level_shift: 1e-4,
        }
    }

    pub fn with_level_shift(mut self, level_shift: f64) -> Self {
        self.level_shift = level_shift;
        self
    }

    pub fn space(&self, norb: usize, nelec: impl Into<Nelec>) -> Result<FciSpace, FciError> {
        FciSpace::new(&self.indexer, norb, nelec)
    }

    /// Lowest eigenpair of the Hamiltonian `(h1e, g2e)` in the `(norb, nelec)` space.
    pub fn kernel(
        &self,
        h1e: &DMatrix<f64>,
        g2e: &Tensor4,
        norb: usize,
        nelec: impl Into<Nelec>,
    ) -> Result<FciSolution, FciError> {
        let nelec = nelec.into();
        let space = self.space(norb, nelec)?;

        info!("===========================================");
        info!("        FCI (direct CI) Calculation");
        info!("===========================================");
        info!("Number of orbitals: {}", norb);
        info!("Electrons: {}", nelec);
        info!("Alpha strings: {}", space.na());
        info!("Beta strings: {}", space.nb());
        info!("Determinants: {}", space.ndet());

        let h2e = absorb_h1e(h1e, g2e, norb, nelec, 0.5)?;
        let hdiag = make_hdiag(h1e, g2e, &space)?;

        let mut ci0 = DVector::zeros(space.ndet());
        ci0[0] = 1.0;

        let hop = |c: &DVector<f64>| {
            let ci = space.unflatten_unchecked(c);
            space.flatten(&contract_2e_unchecked(&h2e, &ci, &space))
        };
        let level_shift = self.level_shift;
        let precond = |r: &DVector<f64>, e: f64| {
            r.zip_map(&hdiag, |ri, hi| ri / (hi - e + level_shift))
        };

        let pair = self.eigensolver.lowest(hop, ci0, precond)?;
        if pair.converged {
            info!("FCI converged in {} cycles", pair.cycles);
        } else {
            warn!("FCI eigensolver not converged after {} cycles", pair.cycles);
        }
        info!("FCI electronic energy: {:.10} Eh", pair.value);
        info!("===========================================");

        let civec = space.unflatten_unchecked(&pair.vector);
        Ok(FciSolution {
            energy: pair.value,
            civec,
            converged: pair.converged,
            cycles: pair.cycles,
            space,
        })
    }
}

/// Ground state with the default indexer and Davidson settings.
pub fn kernel(
    h1e: &DMatrix<f64>,
    g2e: &Tensor4,
    norb: usize,
    nelec: impl Into<Nelec>,
) -> Result<FciSolution, FciError> {
    let solver: FciSolver = FciSolver::default();
    solver.kernel(h1e, g2e, norb, nelec)
}
