//! AO integral matrices for a list of basis functions and point nuclei.

use crate::basis::Basis;
use nalgebra::{DMatrix, Vector3};
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nucleus {
    pub charge: u32,
    /// Bohr
    pub position: Vector3<f64>,
}

/// One-electron matrices and 8-fold packed electron-repulsion integrals.
///
/// `eri` holds `(ij|kl)` for `i >= j`, `k >= l`, `ij >= kl`, at position
/// `ij * (ij + 1) / 2 + kl` with `ij = i * (i + 1) / 2 + j`.
#[derive(Debug, Clone)]
pub struct AoIntegrals {
    pub overlap: DMatrix<f64>,
    pub kinetic: DMatrix<f64>,
    pub nuclear: DMatrix<f64>,
    pub eri: Vec<f64>,
}

impl AoIntegrals {
    pub fn compute<B: Basis + Sync>(basis: &[B], nuclei: &[Nucleus]) -> Self {
        let nao = basis.len();
        let overlap = DMatrix::from_fn(nao, nao, |i, j| B::Sab(&basis[i], &basis[j]));
        let kinetic = DMatrix::from_fn(nao, nao, |i, j| B::Tab(&basis[i], &basis[j]));
        let nuclear = DMatrix::from_fn(nao, nao, |i, j| {
            nuclei
                .iter()
                .map(|n| B::Vab(&basis[i], &basis[j], n.position, n.charge))
                .sum()
        });

        let pairs: Vec<(usize, usize)> = (0..nao)
            .flat_map(|i| (0..=i).map(move |j| (i, j)))
            .collect();
        let rows: Vec<Vec<f64>> = pairs
            .par_iter()
            .enumerate()
            .map(|(ij, &(i, j))| {
                pairs[..=ij]
                    .iter()
                    .map(|&(k, l)| B::JKabcd(&basis[i], &basis[j], &basis[k], &basis[l]))
                    .collect()
            })
            .collect();

        AoIntegrals {
            overlap,
            kinetic,
            nuclear,
            eri: rows.concat(),
        }
    }

    pub fn nao(&self) -> usize {
        self.overlap.nrows()
    }

    /// Core Hamiltonian `T + V`.
    pub fn hcore(&self) -> DMatrix<f64> {
        &self.kinetic + &self.nuclear
    }
}

pub fn nuclear_repulsion(nuclei: &[Nucleus]) -> f64 {
    let mut e = 0.0;
    for (a, na) in nuclei.iter().enumerate() {
        for nb in &nuclei[..a] {
            e += (na.charge * nb.charge) as f64 / (na.position - nb.position).norm();
        }
    }
    e
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cgto::{ContractedGTO, Sto3G};
    use approx::assert_relative_eq;
    use periodic_table_on_an_enum::Element;

    fn h2(bond: f64) -> (Vec<ContractedGTO>, Vec<Nucleus>) {
        let centers = [Vector3::zeros(), Vector3::new(0.0, 0.0, bond)];
        let basis = centers
            .iter()
            .flat_map(|&c| Sto3G::shells(&Element::Hydrogen, c).unwrap())
            .collect();
        let nuclei = centers
            .iter()
            .map(|&position| Nucleus {
                charge: 1,
                position,
            })
            .collect();
        (basis, nuclei)
    }

    #[test]
    fn test_h2_sto3g_reference_integrals() {
        // Szabo & Ostlund, H2 at R = 1.4 Bohr
        let (basis, nuclei) = h2(1.4);
        let ints = AoIntegrals::compute(&basis, &nuclei);
        assert_eq!(ints.nao(), 2);
        assert_eq!(ints.eri.len(), 6);

        assert_relative_eq!(ints.overlap[(0, 1)], 0.6593, epsilon = 2e-4);
        assert_relative_eq!(ints.kinetic[(0, 0)], 0.7600, epsilon = 2e-4);
        assert_relative_eq!(ints.kinetic[(0, 1)], 0.2365, epsilon = 2e-4);
        assert_relative_eq!(ints.hcore()[(0, 0)], -1.1204, epsilon = 2e-4);
        assert_relative_eq!(ints.hcore()[(0, 1)], -0.9584, epsilon = 2e-4);

        // (11|11), (21|11), (21|21), (22|11)
        assert_relative_eq!(ints.eri[0], 0.7746, epsilon = 2e-4);
        assert_relative_eq!(ints.eri[1], 0.4441, epsilon = 2e-4);
        assert_relative_eq!(ints.eri[2], 0.2970, epsilon = 2e-4);
        assert_relative_eq!(ints.eri[3], 0.5697, epsilon = 2e-4);
        assert_relative_eq!(ints.eri[5], 0.7746, epsilon = 2e-4);

        assert_relative_eq!(nuclear_repulsion(&nuclei), 1.0 / 1.4, epsilon = 1e-14);
    }

    #[test]
    fn test_one_electron_matrices_are_symmetric() {
        let (basis, nuclei) = h2(2.1);
        let ints = AoIntegrals::compute(&basis, &nuclei);
        assert_relative_eq!(ints.overlap.clone(), ints.overlap.transpose(), epsilon = 1e-14);
        assert_relative_eq!(ints.nuclear.clone(), ints.nuclear.transpose(), epsilon = 1e-14);
    }
}
