/* Contracted s-type Gaussian orbitals built on the primitives in gto.rs,
   plus the STO-3G tables for the first period.
*/
#![allow(non_snake_case)]

use crate::basis::{Basis, BasisError};
use crate::gto::GTO;
use itertools::iproduct;
use nalgebra::Vector3;
use periodic_table_on_an_enum::Element;

// STO-3G 1s contraction, shared by H and He
const STO3G_1S_COEFFS: [f64; 3] = [0.15432897, 0.53532814, 0.44463454];
const STO3G_H_EXPS: [f64; 3] = [3.42525091, 0.62391373, 0.16885540];
const STO3G_HE_EXPS: [f64; 3] = [6.36242139, 1.15892300, 0.31364979];

#[derive(Debug, Clone, PartialEq)]
pub struct ContractedGTO {
    pub primitives: Vec<GTO>,
    pub coefficients: Vec<f64>,
    // 1s, 2s, ...
    pub shell_type: String,
}

impl ContractedGTO {
    /// Contract normalized primitives and rescale so that `<φ|φ> = 1`.
    pub fn new(exponents: &[f64], coefficients: &[f64], center: Vector3<f64>, shell_type: &str) -> Self {
        let primitives: Vec<GTO> = exponents.iter().map(|&a| GTO::new(a, center)).collect();
        let mut cgto = ContractedGTO {
            primitives,
            coefficients: coefficients.to_vec(),
            shell_type: shell_type.to_string(),
        };
        let norm = ContractedGTO::Sab(&cgto, &cgto).sqrt();
        cgto.coefficients.iter_mut().for_each(|c| *c /= norm);
        cgto
    }

    pub fn center(&self) -> Vector3<f64> {
        self.primitives
            .first()
            .map(|g| g.center)
            .unwrap_or_else(Vector3::zeros)
    }

    fn pairs<'a>(a: &'a Self, b: &'a Self) -> impl Iterator<Item = (f64, &'a GTO, &'a GTO)> {
        a.coefficients
            .iter()
            .zip(&a.primitives)
            .flat_map(move |(ca, ga)| {
                b.coefficients
                    .iter()
                    .zip(&b.primitives)
                    .map(move |(cb, gb)| (ca * cb, ga, gb))
            })
    }
}

impl Basis for ContractedGTO {
    fn evaluate(&self, r: &Vector3<f64>) -> f64 {
        self.coefficients
            .iter()
            .zip(&self.primitives)
            .map(|(c, g)| c * g.evaluate(r))
            .sum()
    }

    fn Sab(a: &Self, b: &Self) -> f64 {
        ContractedGTO::pairs(a, b)
            .map(|(c, ga, gb)| c * GTO::Sab(ga, gb))
            .sum()
    }

    fn Tab(a: &Self, b: &Self) -> f64 {
        ContractedGTO::pairs(a, b)
            .map(|(c, ga, gb)| c * GTO::Tab(ga, gb))
            .sum()
    }

    fn Vab(a: &Self, b: &Self, R: Vector3<f64>, Z: u32) -> f64 {
        ContractedGTO::pairs(a, b)
            .map(|(c, ga, gb)| c * GTO::Vab(ga, gb, R, Z))
            .sum()
    }

    fn JKabcd(a: &Self, b: &Self, c: &Self, d: &Self) -> f64 {
        iproduct!(ContractedGTO::pairs(a, b), ContractedGTO::pairs(c, d).collect::<Vec<_>>())
            .map(|((cab, ga, gb), (ccd, gc, gd))| cab * ccd * GTO::JKabcd(ga, gb, gc, gd))
            .sum()
    }
}

/// Minimal STO-3G basis.
pub struct Sto3G;

impl Sto3G {
    pub const NAME: &'static str = "sto-3g";

    /// Shells centered on an atom of `element` at `center` (Bohr).
    pub fn shells(element: &Element, center: Vector3<f64>) -> Result<Vec<ContractedGTO>, BasisError> {
        let exponents = match element.get_atomic_number() {
            1 => &STO3G_H_EXPS,
            2 => &STO3G_HE_EXPS,
            _ => {
                return Err(BasisError::UnsupportedElement {
                    basis: Sto3G::NAME.to_string(),
                    element: element.get_symbol().to_string(),
                })
            }
        };
        Ok(vec![ContractedGTO::new(exponents, &STO3G_1S_COEFFS, center, "1s")])
    }

    /// Resolve a basis name from the configuration.
    pub fn by_name(name: &str) -> Result<Sto3G, BasisError> {
        if name.eq_ignore_ascii_case(Sto3G::NAME) {
            Ok(Sto3G)
        } else {
            Err(BasisError::UnsupportedBasis(name.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_contracted_is_normalized() {
        let shells = Sto3G::shells(&Element::Hydrogen, Vector3::new(0.0, 1.0, 0.0)).unwrap();
        assert_eq!(shells.len(), 1);
        let s = &shells[0];
        assert_relative_eq!(ContractedGTO::Sab(s, s), 1.0, epsilon = 1e-14);
        assert_eq!(s.center(), Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_hydrogen_atom_energy() {
        // STO-3G hydrogen atom, <T> + <V> = -0.46658185 Eh
        let s = &Sto3G::shells(&Element::Hydrogen, Vector3::zeros()).unwrap()[0];
        let e = ContractedGTO::Tab(s, s) + ContractedGTO::Vab(s, s, Vector3::zeros(), 1);
        assert_relative_eq!(e, -0.46658185, epsilon = 1e-6);
    }

    #[test]
    fn test_unsupported_inputs() {
        assert!(matches!(
            Sto3G::shells(&Element::Carbon, Vector3::zeros()),
            Err(BasisError::UnsupportedElement { .. })
        ));
        assert!(Sto3G::by_name("STO-3G").is_ok());
        assert_eq!(
            Sto3G::by_name("6-31g").err(),
            Some(BasisError::UnsupportedBasis("6-31g".to_string()))
        );
    }
}
