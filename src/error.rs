//! Error types for the FCI library.
//!
//! Every fallible routine returns [`FciError`]. Numerical degeneracies
//! (zero electrons, near-singular preconditioner denominators) are regularized
//! in place and never reported here.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FciError {
    /// An integral tensor or CI array does not match `norb` / `nelec`.
    #[error("Dimension mismatch for {what}: expected {expected}, found {found}.")]
    ShapeMismatch {
        what: &'static str,
        expected: String,
        found: String,
    },

    /// More electrons than orbitals in one spin channel.
    #[error("Cannot place {nelec} electrons of one spin in {norb} orbitals.")]
    InvalidElectronCount { nelec: usize, norb: usize },

    /// Determinant strings are stored as 64-bit patterns.
    #[error("At most 64 orbitals are supported, got {norb}.")]
    TooManyOrbitals { norb: usize },

    /// The eigensolver was handed a zero initial guess.
    #[error("Initial guess vector has zero norm; the search subspace is empty.")]
    EmptySubspace,
}

impl FciError {
    pub(crate) fn shape(
        what: &'static str,
        expected: impl ToString,
        found: impl ToString,
    ) -> Self {
        FciError::ShapeMismatch {
            what,
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_message() {
        let error = FciError::shape("h1e", "4x4", "3x4");
        assert_eq!(
            error.to_string(),
            "Dimension mismatch for h1e: expected 4x4, found 3x4."
        );
    }

    #[test]
    fn test_invalid_electron_count_message() {
        let error = FciError::InvalidElectronCount { nelec: 5, norb: 4 };
        assert_eq!(
            error.to_string(),
            "Cannot place 5 electrons of one spin in 4 orbitals."
        );
    }
}
