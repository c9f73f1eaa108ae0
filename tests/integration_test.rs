//! End-to-end FCI calculations from the example YAML inputs
//!
//! Integrals are built from scratch, so these also exercise the basis crate,
//! the AO→MO transformation and the Davidson driver together.

use std::path::PathBuf;

#[cfg(test)]
mod integration_tests {
    use super::*;
    use approx::assert_relative_eq;
    use fci::app::{build_mo_integrals, build_molecule, load_config, run_calculation};
    use fci::config::Args;
    use fci::{energy, kernel, Nelec};

    /// Helper function to get the path to example files
    fn example_path(filename: &str) -> String {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("example")
            .join(filename)
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn test_h6_sto3g_fci_energy() {
        let config = load_config(&example_path("h6_fci.yaml")).unwrap();
        let report = run_calculation(&Args::default(), &config).unwrap();

        assert_eq!(report.norb, 6);
        assert_eq!(report.nelec, Nelec::new(2, 2));
        assert!(report.converged);
        assert_relative_eq!(report.e_elec, -7.9766331504361414, epsilon = 1e-6);
        assert_relative_eq!(report.e_tot, report.e_elec + report.e_nuc, epsilon = 1e-14);

        let e_rdm = report.rdm_energy.unwrap();
        assert_relative_eq!(e_rdm, report.e_elec, epsilon = 1e-8);

        let occ = report.natural_occupations.unwrap();
        assert_relative_eq!(occ.iter().sum::<f64>(), 4.0, epsilon = 1e-8);
        assert!(occ.iter().all(|&n| (-1e-10..=2.0 + 1e-10).contains(&n)));
    }

    #[test]
    fn test_h6_kernel_on_transformed_integrals() {
        let config = load_config(&example_path("h6_fci.yaml")).unwrap();
        let molecule = build_molecule(&config).unwrap();
        let mo = build_mo_integrals(&molecule, "sto-3g").unwrap();

        let solution = kernel(&mo.h1e, &mo.eri, mo.norb(), Nelec::split(4)).unwrap();
        assert_relative_eq!(solution.energy, -7.9766331504361414, epsilon = 1e-6);

        let e = energy(&mo.h1e, &mo.eri, &solution.civec, &solution.space).unwrap();
        assert_relative_eq!(e, solution.energy, epsilon = 1e-9);
    }

    #[test]
    fn test_h2_sto3g_fci_energy() {
        // H2 at 1.4 Bohr, minimal-basis FCI total energy
        let config = load_config(&example_path("h2_fci.yaml")).unwrap();
        let report = run_calculation(&Args::default(), &config).unwrap();

        assert_eq!(report.nelec, Nelec::new(1, 1));
        assert_relative_eq!(report.e_nuc, 1.0 / 1.4, epsilon = 1e-8);
        assert_relative_eq!(report.e_tot, -1.1372838, epsilon = 1e-5);
    }

    #[test]
    fn test_charge_override_changes_electron_count() {
        let config = load_config(&example_path("h6_fci.yaml")).unwrap();
        let args = Args {
            charge: Some(4),
            ..Args::default()
        };
        let report = run_calculation(&args, &config).unwrap();
        assert_eq!(report.nelec, Nelec::new(1, 1));
        assert!(report.e_elec > -7.9766331504361414);
    }
}
