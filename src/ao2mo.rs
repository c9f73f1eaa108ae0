//! Two-electron integral transformations.
//!
//! - [`restore`] expands permutation-packed integral storage into a dense [`Tensor4`]
//! - [`full`] transforms dense integrals into another orbital basis:
//!   (ij|kl) = Σ_{pqrs} C_pi C_qj C_rk C_sl (pq|rs)

extern crate nalgebra as na;

use crate::error::FciError;
use crate::tensor::Tensor4;
use na::DMatrix;
use tracing::debug;

/// Compound index of a lower-triangular pair, `p >= q` not required.
#[inline]
pub fn pair_index(p: usize, q: usize) -> usize {
    if p >= q {
        p * (p + 1) / 2 + q
    } else {
        q * (q + 1) / 2 + p
    }
}

/// Expand packed electron-repulsion integrals to the dense `(n,n,n,n)` tensor.
///
/// Accepted layouts, distinguished by length:
/// - `n⁴`: dense, row-major `[p][q][r][s]`
/// - `npair²`: 4-fold packed, `[pq][rs]` over lower-triangular pairs
/// - `npair(npair+1)/2`: 8-fold packed, lower triangle of the pair matrix
pub fn restore(norb: usize, packed: &[f64]) -> Result<Tensor4, FciError> {
    let npair = norb * (norb + 1) / 2;
    let len = packed.len();

    if len == norb.pow(4) {
        debug!("restore: dense integrals for {} orbitals", norb);
        return Ok(Tensor4::from_fn(norb, |p, q, r, s| {
            packed[((p * norb + q) * norb + r) * norb + s]
        }));
    }
    if len == npair * npair {
        debug!("restore: 4-fold packed integrals for {} orbitals", norb);
        return Ok(Tensor4::from_fn(norb, |p, q, r, s| {
            packed[pair_index(p, q) * npair + pair_index(r, s)]
        }));
    }
    if len == npair * (npair + 1) / 2 {
        debug!("restore: 8-fold packed integrals for {} orbitals", norb);
        return Ok(Tensor4::from_fn(norb, |p, q, r, s| {
            packed[pair_index(pair_index(p, q), pair_index(r, s))]
        }));
    }

    Err(FciError::shape(
        "packed two-electron integrals",
        format!(
            "{} (dense), {} (4-fold) or {} (8-fold)",
            norb.pow(4),
            npair * npair,
            npair * (npair + 1) / 2
        ),
        len,
    ))
}

/// Transform integrals with coefficient matrix `c` (`nao × nmo`).
pub fn full(eri: &Tensor4, c: &DMatrix<f64>) -> Result<Tensor4, FciError> {
    let nao = eri.norb();
    if c.nrows() != nao {
        return Err(FciError::shape(
            "orbital coefficients",
            format!("{nao} rows"),
            format!("{} rows", c.nrows()),
        ));
    }
    let nmo = c.ncols();

    // (pq|rs) -> (ij|rs) -> transpose -> (kl|ij) -> transpose
    let half = half_transform(eri.as_matrix(), c);
    let full = half_transform(&half.transpose(), c).transpose();
    Tensor4::from_matrix(nmo, full)
}

/// Transform the row pair index of `m` (`nao² × ncols`), column by column.
fn half_transform(m: &DMatrix<f64>, c: &DMatrix<f64>) -> DMatrix<f64> {
    let nao = c.nrows();
    let nmo = c.ncols();
    let ct = c.transpose();
    let mut out = DMatrix::zeros(nmo * nmo, m.ncols());

    for col in 0..m.ncols() {
        let a = DMatrix::from_fn(nao, nao, |p, q| m[(p * nao + q, col)]);
        let b = &ct * a * c;
        for i in 0..nmo {
            for j in 0..nmo {
                out[(i * nmo + j, col)] = b[(i, j)];
            }
        }
    }
    out
}
