use crate::app::runner::MoIntegrals;
use crate::fci_impl::{FciSolution, Nelec};
use color_eyre::eyre::Result;
use nalgebra::DMatrix;
use tracing::{info, warn};

/// Final results of one calculation.
#[derive(Debug, Clone)]
pub struct FciReport {
    pub norb: usize,
    pub nelec: Nelec,
    pub converged: bool,
    pub cycles: usize,
    pub e_nuc: f64,
    pub e_elec: f64,
    pub e_tot: f64,
    /// `Σ h·dm1 + ½ Σ g·dm2`, when density matrices were requested
    pub rdm_energy: Option<f64>,
    /// Eigenvalues of the spin-summed 1-RDM, descending
    pub natural_occupations: Option<Vec<f64>>,
}

impl FciReport {
    pub fn new(mo: &MoIntegrals, solution: &FciSolution) -> Self {
        FciReport {
            norb: mo.norb(),
            nelec: solution.space.nelec(),
            converged: solution.converged,
            cycles: solution.cycles,
            e_nuc: mo.e_nuc,
            e_elec: solution.energy,
            e_tot: solution.energy + mo.e_nuc,
            rdm_energy: None,
            natural_occupations: None,
        }
    }

    /// Build the density matrices and record their diagnostics.
    pub fn with_density_matrices(mut self, mo: &MoIntegrals, solution: &FciSolution) -> Result<Self> {
        let (dm1, dm2) = solution.make_rdm12()?;
        self.rdm_energy = Some(mo.h1e.dot(&dm1) + 0.5 * mo.eri.dot(&dm2));
        self.natural_occupations = Some(natural_occupations(&dm1));
        Ok(self)
    }
}

pub fn natural_occupations(dm1: &DMatrix<f64>) -> Vec<f64> {
    let mut occ: Vec<f64> = dm1.clone().symmetric_eigen().eigenvalues.iter().copied().collect();
    occ.sort_by(|a, b| b.total_cmp(a));
    occ
}

pub fn report_summary(report: &FciReport, mo: &MoIntegrals) {
    info!("\nFCI calculation finished.");

    info!("\nCore-Hamiltonian orbital energies:");
    for (i, e) in mo.orbital_energies.iter().enumerate() {
        info!("  Orbital {}: {:.8} au", i + 1, e);
    }

    if !report.converged {
        warn!("Energy below is not converged ({} cycles)", report.cycles);
    }
    info!("\nNuclear repulsion energy: {:.10} au", report.e_nuc);
    info!("FCI electronic energy:    {:.10} au", report.e_elec);
    info!("FCI total energy:         {:.10} au", report.e_tot);

    if let Some(e_rdm) = report.rdm_energy {
        info!(
            "\nRDM energy: {:.10} au (deviation {:.3e})",
            e_rdm,
            (e_rdm - report.e_elec).abs()
        );
    }
    if let Some(occ) = &report.natural_occupations {
        info!("Natural orbital occupations:");
        for (i, n) in occ.iter().enumerate() {
            info!("  {:>3}: {:.8}", i + 1, n);
        }
        info!("  Sum: {:.8}", occ.iter().sum::<f64>());
    }
}
