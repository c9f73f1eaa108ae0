//! Direct-CI Hamiltonian action.
//!
//! The CI coefficient array `c[I, J]` is indexed by alpha string `I` and beta
//! string `J`. The Hamiltonian is applied through the excitation intermediate
//!
//! t1[(a,i), (I,J)] = Σ sign · c[src, J]   over alpha links src -> I
//!                  + Σ sign · c[I, src]   over beta links  src -> J
//!
//! which holds `E_ai |Ψ⟩` for every orbital pair. One-body operators contract it
//! directly, two-body operators contract it with the pair-indexed integral matrix
//! and scatter the result back through the adjoint excitation.

extern crate nalgebra as na;

use crate::cistring::{LinkIndex, StringIndexer};
use crate::error::FciError;
use crate::tensor::Tensor4;
use na::{DMatrix, DVector};
use rayon::prelude::*;
use std::fmt;
use std::sync::Arc;

/// Electron counts per spin channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nelec {
    pub alpha: usize,
    pub beta: usize,
}

impl Nelec {
    pub fn new(alpha: usize, beta: usize) -> Self {
        Nelec { alpha, beta }
    }

    /// Split a total count evenly, the odd electron going to alpha.
    pub fn split(total: usize) -> Self {
        let beta = total / 2;
        Nelec {
            alpha: total - beta,
            beta,
        }
    }

    pub fn total(&self) -> usize {
        self.alpha + self.beta
    }
}

impl From<usize> for Nelec {
    fn from(total: usize) -> Self {
        Nelec::split(total)
    }
}

impl From<(usize, usize)> for Nelec {
    fn from((alpha, beta): (usize, usize)) -> Self {
        Nelec::new(alpha, beta)
    }
}

impl fmt::Display for Nelec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}α, {}β)", self.alpha, self.beta)
    }
}

/// Determinant space of one `(norb, nelec)` problem with its link tables.
#[derive(Debug, Clone)]
pub struct FciSpace {
    norb: usize,
    nelec: Nelec,
    link_a: Arc<LinkIndex>,
    link_b: Arc<LinkIndex>,
}

impl FciSpace {
    pub fn new<S>(indexer: &S, norb: usize, nelec: impl Into<Nelec>) -> Result<Self, FciError>
    where
        S: StringIndexer + ?Sized,
    {
        let nelec = nelec.into();
        let link_a = indexer.link_index(norb, nelec.alpha)?;
        let link_b = indexer.link_index(norb, nelec.beta)?;
        Ok(FciSpace {
            norb,
            nelec,
            link_a,
            link_b,
        })
    }

    pub fn norb(&self) -> usize {
        self.norb
    }

    pub fn nelec(&self) -> Nelec {
        self.nelec
    }

    pub fn na(&self) -> usize {
        self.link_a.nstrings()
    }

    pub fn nb(&self) -> usize {
        self.link_b.nstrings()
    }

    /// Number of determinants, `Na * Nb`.
    pub fn ndet(&self) -> usize {
        self.na() * self.nb()
    }

    pub fn link_a(&self) -> &LinkIndex {
        &self.link_a
    }

    pub fn link_b(&self) -> &LinkIndex {
        &self.link_b
    }

    pub fn check_civec(&self, civec: &DMatrix<f64>) -> Result<(), FciError> {
        if civec.shape() != (self.na(), self.nb()) {
            return Err(FciError::shape(
                "CI coefficient array",
                format!("{}x{}", self.na(), self.nb()),
                format!("{}x{}", civec.nrows(), civec.ncols()),
            ));
        }
        Ok(())
    }

    /// Row-major flattening, determinant `(I, J)` at `I * Nb + J`.
    pub fn flatten(&self, civec: &DMatrix<f64>) -> DVector<f64> {
        DVector::from_iterator(civec.len(), civec.transpose().iter().copied())
    }

    pub fn unflatten(&self, flat: &DVector<f64>) -> Result<DMatrix<f64>, FciError> {
        if flat.len() != self.ndet() {
            return Err(FciError::shape("flat CI vector", self.ndet(), flat.len()));
        }
        Ok(self.unflatten_unchecked(flat))
    }

    pub(crate) fn unflatten_unchecked(&self, flat: &DVector<f64>) -> DMatrix<f64> {
        DMatrix::from_row_slice(self.na(), self.nb(), flat.as_slice())
    }
}

pub(crate) fn check_one_body(
    h1e: &DMatrix<f64>,
    norb: usize,
    what: &'static str,
) -> Result<(), FciError> {
    if h1e.shape() != (norb, norb) {
        return Err(FciError::shape(
            what,
            format!("{norb}x{norb}"),
            format!("{}x{}", h1e.nrows(), h1e.ncols()),
        ));
    }
    Ok(())
}

/// Fold the one-electron integrals into a two-electron operator.
///
/// With `f1e = (h1e - ½ Σ_i g[j,i,i,k]) / N`, adding `f1e` to every
/// `(k,k,:,:)` and `(:,:,k,k)` slice lets `½ Σ h2e E E` reproduce the full
/// Hamiltonian inside an `N`-electron space. The result is scaled by `fac`.
pub fn absorb_h1e(
    h1e: &DMatrix<f64>,
    eri: &Tensor4,
    norb: usize,
    nelec: impl Into<Nelec>,
    fac: f64,
) -> Result<Tensor4, FciError> {
    check_one_body(h1e, norb, "one-electron integrals")?;
    eri.check_norb(norb, "two-electron integrals")?;
    let nelec = nelec.into().total() as f64;

    let mut h2e = eri.clone();
    let mut f1e = DMatrix::from_fn(norb, norb, |j, k| {
        h1e[(j, k)] - 0.5 * (0..norb).map(|i| eri[(j, i, i, k)]).sum::<f64>()
    });
    f1e *= 1.0 / (nelec + 1e-100);

    for k in 0..norb {
        for p in 0..norb {
            for q in 0..norb {
                h2e[(k, k, p, q)] += f1e[(p, q)];
                h2e[(p, q, k, k)] += f1e[(p, q)];
            }
        }
    }
    h2e.scale_mut(fac);
    Ok(h2e)
}

/// Excitation intermediate `t1`, shape `norb² × (Na·Nb)`.
fn excitation_intermediate(civec: &DMatrix<f64>, space: &FciSpace) -> DMatrix<f64> {
    let n = space.norb();
    let (na, nb) = (space.na(), space.nb());
    let mut t1 = DMatrix::zeros(n * n, na * nb);

    for (str0, tab) in space.link_a().iter() {
        for e in tab {
            let row = e.a * n + e.i;
            for j in 0..nb {
                t1[(row, e.str1 * nb + j)] += e.sign * civec[(str0, j)];
            }
        }
    }
    for (str0, tab) in space.link_b().iter() {
        for e in tab {
            let row = e.a * n + e.i;
            for i in 0..na {
                t1[(row, i * nb + e.str1)] += e.sign * civec[(i, str0)];
            }
        }
    }
    t1
}

/// Apply the adjoint excitations to `t2`, the inverse scatter of `t1`.
fn scatter_adjoint(t2: &DMatrix<f64>, space: &FciSpace) -> DMatrix<f64> {
    let n = space.norb();
    let (na, nb) = (space.na(), space.nb());
    let mut sigma = DMatrix::zeros(na, nb);

    for (str0, tab) in space.link_a().iter() {
        for e in tab {
            let row = e.a * n + e.i;
            for j in 0..nb {
                sigma[(e.str1, j)] += e.sign * t2[(row, str0 * nb + j)];
            }
        }
    }
    for (str0, tab) in space.link_b().iter() {
        for e in tab {
            let row = e.a * n + e.i;
            for i in 0..na {
                sigma[(i, e.str1)] += e.sign * t2[(row, i * nb + str0)];
            }
        }
    }
    sigma
}

/// `Σ_ai f1e[a,i] E_ai |c⟩`.
pub fn contract_1e(
    f1e: &DMatrix<f64>,
    civec: &DMatrix<f64>,
    space: &FciSpace,
) -> Result<DMatrix<f64>, FciError> {
    let n = space.norb();
    check_one_body(f1e, n, "one-electron operator")?;
    space.check_civec(civec)?;

    let t1 = excitation_intermediate(civec, space);
    let fvec = DVector::from_fn(n * n, |pq, _| f1e[(pq / n, pq % n)]);
    let flat = t1.tr_mul(&fvec);
    Ok(space.unflatten_unchecked(&flat))
}

/// `Σ_{ai,bj} eri[a,i,b,j] E_ia E_bj |c⟩`.
///
/// With integrals folded by [`absorb_h1e`] at `fac = 0.5` this is `H|c⟩`.
pub fn contract_2e(
    eri: &Tensor4,
    civec: &DMatrix<f64>,
    space: &FciSpace,
) -> Result<DMatrix<f64>, FciError> {
    eri.check_norb(space.norb(), "two-electron operator")?;
    space.check_civec(civec)?;
    Ok(contract_2e_unchecked(eri, civec, space))
}

pub(crate) fn contract_2e_unchecked(
    eri: &Tensor4,
    civec: &DMatrix<f64>,
    space: &FciSpace,
) -> DMatrix<f64> {
    let t1 = excitation_intermediate(civec, space);
    let t2 = eri.as_matrix() * t1;
    scatter_adjoint(&t2, space)
}

/// Exact Hamiltonian diagonal, flattened in the same `I * Nb + J` order as
/// [`FciSpace::flatten`].
pub fn make_hdiag(
    h1e: &DMatrix<f64>,
    g2e: &Tensor4,
    space: &FciSpace,
) -> Result<DVector<f64>, FciError> {
    let n = space.norb();
    check_one_body(h1e, n, "one-electron integrals")?;
    g2e.check_norb(n, "two-electron integrals")?;

    let diagj = DMatrix::from_fn(n, n, |p, q| g2e[(p, p, q, q)]);
    let diagk = DMatrix::from_fn(n, n, |p, q| g2e[(p, q, q, p)]);
    let block = |m: &DMatrix<f64>, x: &[usize], y: &[usize]| -> f64 {
        x.iter()
            .map(|&p| y.iter().map(|&q| m[(p, q)]).sum::<f64>())
            .sum()
    };

    let occa: Vec<Vec<usize>> = (0..space.na())
        .map(|s| space.link_a().occupied(s).collect())
        .collect();
    let occb: Vec<Vec<usize>> = (0..space.nb())
        .map(|s| space.link_b().occupied(s).collect())
        .collect();

    let rows: Vec<Vec<f64>> = occa
        .par_iter()
        .map(|aocc| {
            let ea: f64 = aocc.iter().map(|&p| h1e[(p, p)]).sum();
            let jaa = block(&diagj, aocc, aocc) - block(&diagk, aocc, aocc);
            occb.iter()
                .map(|bocc| {
                    let e1 = ea + bocc.iter().map(|&p| h1e[(p, p)]).sum::<f64>();
                    let e2 = jaa
                        + block(&diagj, aocc, bocc)
                        + block(&diagj, bocc, aocc)
                        + block(&diagj, bocc, bocc)
                        - block(&diagk, bocc, bocc);
                    e1 + 0.5 * e2
                })
                .collect()
        })
        .collect();

    Ok(DVector::from_iterator(
        space.ndet(),
        rows.into_iter().flatten(),
    ))
}

/// Expectation value `⟨c|H|c⟩` (not divided by the norm).
pub fn energy(
    h1e: &DMatrix<f64>,
    eri: &Tensor4,
    civec: &DMatrix<f64>,
    space: &FciSpace,
) -> Result<f64, FciError> {
    let h2e = absorb_h1e(h1e, eri, space.norb(), space.nelec(), 0.5)?;
    let sigma = contract_2e(&h2e, civec, space)?;
    Ok(civec.dot(&sigma))
}
