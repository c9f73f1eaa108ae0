//! Gaussian basis functions and one-/two-electron integrals over them.
//!
//! Only s-type shells are implemented, which covers the minimal basis of
//! hydrogen and helium.

pub mod basis;
pub mod cgto;
pub mod gto;
pub mod helper;
pub mod integrals;

pub use basis::{Basis, BasisError};
pub use cgto::{ContractedGTO, Sto3G};
pub use gto::GTO;
pub use integrals::{nuclear_repulsion, AoIntegrals, Nucleus};
