//! Full configuration interaction with the direct-CI algorithm.
//!
//! The library part ([`fci_impl`] and its collaborators) works on integrals in
//! any orthonormal orbital basis. The [`app`] layer builds those integrals for
//! small molecules from a YAML input and drives a calculation end to end.

pub mod ao2mo;
pub mod app;
pub mod cistring;
pub mod config;
pub mod davidson;
pub mod error;
pub mod fci_impl;
pub mod io;
pub mod tensor;

pub use error::FciError;
pub use fci_impl::{
    absorb_h1e, contract_1e, contract_2e, energy, kernel, make_hdiag, make_rdm1, make_rdm12,
    make_rdm1s, reorder_rdm, reorder_rdm_inplace, FciSolution, FciSolver, FciSpace, Nelec,
};
pub use tensor::Tensor4;
