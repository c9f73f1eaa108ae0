//! Configuration management for FCI calculations
//!
//! YAML input files are parsed into [`Config`]; missing optional values are
//! filled by `with_defaults`, and command-line [`Args`] take precedence over both.

mod args;

pub use args::Args;

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Molecular geometry
    pub geometry: Vec<AtomConfig>,

    /// Basis set name, shared by all atoms
    #[serde(default)]
    pub basis: Option<String>,

    /// Molecular charge (optional)
    #[serde(default)]
    pub charge: Option<i32>,

    /// Total electron count; overrides the count derived from charge
    #[serde(default)]
    pub nelec: Option<usize>,

    /// Explicit alpha/beta counts, both must be given
    #[serde(default)]
    pub neleca: Option<usize>,
    #[serde(default)]
    pub nelecb: Option<usize>,

    /// Davidson/FCI parameters
    #[serde(default)]
    pub fci_params: FciParams,

    /// Build density matrices after the energy
    #[serde(default)]
    pub rdm: Option<bool>,
}

/// Atom configuration in the molecular geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtomConfig {
    /// Element symbol (e.g., "H", "He")
    pub element: String,

    /// Atomic coordinates [x, y, z] in Angstroms
    pub coords: [f64; 3],
}

/// FCI solver parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FciParams {
    /// Maximum number of Davidson iterations
    #[serde(default)]
    pub max_cycle: Option<usize>,

    /// Eigenvalue convergence threshold in Hartree; the residual
    /// threshold is its square root
    #[serde(default)]
    pub conv_tol: Option<f64>,

    /// Subspace size at which Davidson collapses to the current Ritz vector
    #[serde(default)]
    pub max_space: Option<usize>,

    /// Shift added to preconditioner denominators
    #[serde(default)]
    pub level_shift: Option<f64>,
}

impl Default for FciParams {
    fn default() -> Self {
        FciParams {
            max_cycle: Some(100),
            conv_tol: Some(1e-12),
            max_space: Some(16),
            level_shift: Some(1e-4),
        }
    }
}

impl FciParams {
    /// Apply default values to any missing fields
    pub fn with_defaults(mut self) -> Self {
        let defaults = FciParams::default();
        self.max_cycle = self.max_cycle.or(defaults.max_cycle);
        self.conv_tol = self.conv_tol.or(defaults.conv_tol);
        self.max_space = self.max_space.or(defaults.max_space);
        self.level_shift = self.level_shift.or(defaults.level_shift);
        self
    }
}

impl Config {
    /// Apply default values to any missing configuration fields
    pub fn with_defaults(mut self) -> Self {
        self.fci_params = self.fci_params.with_defaults();
        if self.basis.is_none() {
            self.basis = Some("sto-3g".to_string());
        }
        if self.charge.is_none() {
            self.charge = Some(0);
        }
        if self.rdm.is_none() {
            self.rdm = Some(false);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config {
            geometry: vec![],
            basis: None,
            charge: None,
            nelec: None,
            neleca: None,
            nelecb: None,
            fci_params: FciParams {
                max_cycle: Some(20),
                conv_tol: None,
                max_space: None,
                level_shift: None,
            },
            rdm: None,
        }
        .with_defaults();

        assert_eq!(config.basis.as_deref(), Some("sto-3g"));
        assert_eq!(config.charge, Some(0));
        assert_eq!(config.fci_params.max_cycle, Some(20));
        assert_eq!(config.fci_params.conv_tol, Some(1e-12));
        assert_eq!(config.fci_params.max_space, Some(16));
        assert_eq!(config.rdm, Some(false));
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r#"
geometry:
  - element: H
    coords: [0.0, 0.0, 0.0]
  - element: H
    coords: [0.0, 0.0, 0.74]

basis: sto-3g
neleca: 1
nelecb: 1

fci_params:
  conv_tol: 1e-10
  max_space: 12
"#;

        let config: Config = serde_yml::from_str::<Config>(yaml).unwrap().with_defaults();
        assert_eq!(config.geometry.len(), 2);
        assert_eq!(config.geometry[1].coords[2], 0.74);
        assert_eq!(config.neleca, Some(1));
        assert_eq!(config.nelec, None);
        assert_eq!(config.fci_params.conv_tol, Some(1e-10));
        assert_eq!(config.fci_params.max_space, Some(12));
        assert_eq!(config.fci_params.level_shift, Some(1e-4));
    }
}
