//! Reduced density matrices from a CI coefficient array.
//!
//! - `dm1[p,q] = ⟨a†_p a_q⟩`, spin-summed
//! - `dm2[p,q,r,s] = ⟨a†_p a†_r a_s a_q⟩` after [`reorder_rdm`], so that
//!   `E = Σ h1e·dm1 + ½ Σ g2e·dm2`

extern crate nalgebra as na;

use super::direct::{check_one_body, FciSpace};
use crate::error::FciError;
use crate::tensor::Tensor4;
use na::{DMatrix, DVector};
use rayon::prelude::*;

/// Alpha and beta one-particle density matrices.
pub fn make_rdm1s(
    civec: &DMatrix<f64>,
    space: &FciSpace,
) -> Result<(DMatrix<f64>, DMatrix<f64>), FciError> {
    space.check_civec(civec)?;
    let n = space.norb();
    let mut dm_a = DMatrix::zeros(n, n);
    let mut dm_b = DMatrix::zeros(n, n);

    for (str0, tab) in space.link_a().iter() {
        for e in tab {
            dm_a[(e.a, e.i)] += e.sign * civec.row(e.str1).dot(&civec.row(str0));
        }
    }
    for (str0, tab) in space.link_b().iter() {
        for e in tab {
            dm_b[(e.a, e.i)] += e.sign * civec.column(e.str1).dot(&civec.column(str0));
        }
    }
    Ok((dm_a, dm_b))
}

/// Spin-summed one-particle density matrix.
pub fn make_rdm1(civec: &DMatrix<f64>, space: &FciSpace) -> Result<DMatrix<f64>, FciError> {
    let (dm_a, dm_b) = make_rdm1s(civec, space)?;
    Ok(dm_a + dm_b)
}

/// Per-alpha-string intermediate `t1[m, (i,a)]`, `m` running over beta strings.
fn string_intermediate(civec: &DMatrix<f64>, space: &FciSpace, str0: usize) -> DMatrix<f64> {
    let n = space.norb();
    let nb = space.nb();
    let mut t1 = DMatrix::zeros(nb, n * n);

    for e in space.link_a().table(str0) {
        let col = e.i * n + e.a;
        for k in 0..nb {
            t1[(k, col)] += e.sign * civec[(e.str1, k)];
        }
    }
    for (k, tab) in space.link_b().iter() {
        for e in tab {
            t1[(k, e.i * n + e.a)] += e.sign * civec[(str0, e.str1)];
        }
    }
    t1
}

/// One- and two-particle density matrices, the latter already reordered.
pub fn make_rdm12(
    civec: &DMatrix<f64>,
    space: &FciSpace,
) -> Result<(DMatrix<f64>, Tensor4), FciError> {
    space.check_civec(civec)?;
    let n = space.norb();
    let npair = n * n;
    let zeros = || (DVector::<f64>::zeros(npair), DMatrix::<f64>::zeros(npair, npair));

    let (dm1_flat, dm2_raw) = (0..space.na())
        .into_par_iter()
        .fold(zeros, |(mut dm1, mut dm2), str0| {
            let t1 = string_intermediate(civec, space, str0);
            let c0 = civec.row(str0).transpose();
            dm1.gemv_tr(1.0, &t1, &c0, 1.0);
            dm2.gemm_tr(1.0, &t1, &t1, 1.0);
            (dm1, dm2)
        })
        .reduce(zeros, |(a1, a2), (b1, b2)| (a1 + b1, a2 + b2));

    let rdm1 = DMatrix::from_fn(n, n, |i, a| dm1_flat[i * n + a]);
    // E_ij|Ψ⟩ pairs with ⟨Ψ|E_ji on the bra side
    let mut rdm2 = Tensor4::from_matrix(n, dm2_raw)?.transpose_bra();
    reorder_rdm_inplace(&rdm1, &mut rdm2)?;
    Ok((rdm1, rdm2))
}

/// Reorder `⟨E^p_q E^r_s⟩` into `⟨a†_p a†_r a_s a_q⟩`, returning a copy.
pub fn reorder_rdm(rdm1: &DMatrix<f64>, rdm2: &Tensor4) -> Result<Tensor4, FciError> {
    let mut out = rdm2.clone();
    reorder_rdm_inplace(rdm1, &mut out)?;
    Ok(out)
}

/// In-place variant of [`reorder_rdm`].
pub fn reorder_rdm_inplace(rdm1: &DMatrix<f64>, rdm2: &mut Tensor4) -> Result<(), FciError> {
    let n = rdm2.norb();
    check_one_body(rdm1, n, "one-particle density matrix")?;
    for k in 0..n {
        for p in 0..n {
            for q in 0..n {
                rdm2[(p, k, k, q)] -= rdm1[(p, q)];
            }
        }
    }
    Ok(())
}
