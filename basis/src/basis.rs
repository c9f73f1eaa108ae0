#![allow(non_snake_case)]
use nalgebra::Vector3;
use thiserror::Error;

/// A real basis function with closed-form one- and two-electron integrals.
pub trait Basis {
    fn evaluate(&self, r: &Vector3<f64>) -> f64;

    /// overlap <a|b>
    fn Sab(a: &Self, b: &Self) -> f64;
    /// kinetic energy <a|-½∇²|b>
    fn Tab(a: &Self, b: &Self) -> f64;
    /// nuclear attraction <a|-Z/|r-R||b>
    fn Vab(a: &Self, b: &Self, R: Vector3<f64>, Z: u32) -> f64;
    /// electron repulsion (ab|cd), chemists' notation
    fn JKabcd(a: &Self, b: &Self, c: &Self, d: &Self) -> f64;
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BasisError {
    #[error("Unsupported basis set '{0}', only sto-3g is available.")]
    UnsupportedBasis(String),

    #[error("Basis set {basis} has no entry for element {element}.")]
    UnsupportedElement { basis: String, element: String },
}
