//! Full Configuration Interaction (FCI) module
//!
//! This module implements FCI with the direct-CI algorithm: the Hamiltonian is
//! never built. It is applied to a CI coefficient array through signed
//! single-excitation link tables, and the result drives an iterative eigensolver.
//!
//! # Components
//!
//! - **Hamiltonian folding** ([`absorb_h1e`]): one-electron terms are absorbed
//!   into an effective two-electron operator
//! - **Sigma vectors** ([`contract_1e`], [`contract_2e`]): `H|c⟩` without the
//!   Hamiltonian matrix
//! - **Diagonal** ([`make_hdiag`]): exact determinant energies for preconditioning
//! - **Driver** ([`kernel`], [`FciSolver`]): lowest eigenpair via Davidson
//! - **Density matrices** ([`make_rdm1`], [`make_rdm12`], [`reorder_rdm`])
//!
//! # Usage
//!
//! ```rust,ignore
//! use fci::{kernel, Nelec};
//!
//! // h1e: DMatrix (norb x norb), eri: Tensor4 in an orthonormal orbital basis
//! let solution = kernel(&h1e, &eri, norb, Nelec::new(2, 2))?;
//! let (dm1, dm2) = solution.make_rdm12()?;
//! ```

mod direct;
mod rdm;
mod solver;

pub use direct::{absorb_h1e, contract_1e, contract_2e, energy, make_hdiag, FciSpace, Nelec};
pub use rdm::{make_rdm1, make_rdm12, make_rdm1s, reorder_rdm, reorder_rdm_inplace};
pub use solver::{kernel, FciSolution, FciSolver};
