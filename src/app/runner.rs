use crate::ao2mo;
use crate::app::geometry::Molecule;
use crate::cistring::CachedStringIndexer;
use crate::config::{Args, Config};
use crate::davidson::Davidson;
use crate::fci_impl::{FciSolution, FciSolver, Nelec};
use crate::tensor::Tensor4;
use ::basis::{nuclear_repulsion, AoIntegrals, Sto3G};
use color_eyre::eyre::{eyre, Result, WrapErr};
use nalgebra::{DMatrix, DVector};
use tracing::{debug, info};

// smallest overlap eigenvalue accepted by the orthogonalization
const LINDEP_THRESHOLD: f64 = 1e-10;

/// Hamiltonian in an orthonormal orbital basis.
pub struct MoIntegrals {
    pub h1e: DMatrix<f64>,
    pub eri: Tensor4,
    pub e_nuc: f64,
    /// Core-Hamiltonian eigenvalues, ascending
    pub orbital_energies: DVector<f64>,
}

impl MoIntegrals {
    pub fn norb(&self) -> usize {
        self.h1e.nrows()
    }
}

/// AO integrals for `molecule`, transformed to core-Hamiltonian orbitals of
/// the Löwdin-orthogonalized AO space.
pub fn build_mo_integrals(molecule: &Molecule, basis_name: &str) -> Result<MoIntegrals> {
    info!("\nPreparing basis set {}...", basis_name);
    Sto3G::by_name(basis_name)?;
    let mut shells = Vec::new();
    for (elem, &center) in molecule.elements.iter().zip(&molecule.coords) {
        shells.extend(Sto3G::shells(elem, center)?);
    }

    let nuclei = molecule.nuclei();
    let ints = AoIntegrals::compute(&shells, &nuclei);
    let nao = ints.nao();
    info!("Number of basis functions: {}", nao);
    debug!("Packed ERI count: {}", ints.eri.len());

    let x = lowdin_orthogonalizer(&ints.overlap)?;
    let hcore = ints.hcore();
    let eig = (x.transpose() * &hcore * &x).symmetric_eigen();

    let mut order: Vec<usize> = (0..nao).collect();
    order.sort_by(|&a, &b| eig.eigenvalues[a].total_cmp(&eig.eigenvalues[b]));
    let u = DMatrix::from_fn(nao, nao, |i, k| eig.eigenvectors[(i, order[k])]);
    let orbital_energies = DVector::from_fn(nao, |k, _| eig.eigenvalues[order[k]]);
    let c = &x * u;

    let h1e = c.transpose() * &hcore * &c;
    let eri_ao = ao2mo::restore(nao, &ints.eri).wrap_err("Failed to unpack AO integrals")?;
    let eri = ao2mo::full(&eri_ao, &c)?;
    debug!("MO integral symmetry deviation: {:.3e}", eri.max_symmetry_deviation());

    Ok(MoIntegrals {
        h1e,
        eri,
        e_nuc: nuclear_repulsion(&nuclei),
        orbital_energies,
    })
}

/// `S^{-1/2}`
fn lowdin_orthogonalizer(overlap: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    let eig = overlap.clone().symmetric_eigen();
    let smin = eig.eigenvalues.min();
    if smin < LINDEP_THRESHOLD {
        return Err(eyre!(
            "Basis is linearly dependent: smallest overlap eigenvalue {:.3e}",
            smin
        ));
    }
    let inv_sqrt = eig.eigenvalues.map(|s| 1.0 / s.sqrt());
    Ok(&eig.eigenvectors * DMatrix::from_diagonal(&inv_sqrt) * eig.eigenvectors.transpose())
}

/// Alpha/beta electron counts from explicit counts or the molecular charge.
pub fn resolve_nelec(molecule: &Molecule, args: &Args, config: &Config) -> Result<Nelec> {
    if args.charge.is_none() {
        match (config.neleca, config.nelecb) {
            (Some(a), Some(b)) => return Ok(Nelec::new(a, b)),
            (None, None) => {}
            _ => return Err(eyre!("neleca and nelecb must be given together")),
        }
        if let Some(n) = config.nelec {
            return Ok(Nelec::split(n));
        }
    }

    let charge = args.charge.or(config.charge).unwrap_or(0);
    let total = molecule.nuclear_charge() as i64 - charge as i64;
    if total < 0 {
        return Err(eyre!(
            "Charge {} exceeds the nuclear charge {}",
            charge,
            molecule.nuclear_charge()
        ));
    }
    Ok(Nelec::split(total as usize))
}

/// Solver configured from the command line, then the YAML file.
pub fn configure_solver(args: &Args, config: &Config) -> FciSolver {
    let params = &config.fci_params;
    let base = Davidson::default();

    let tol = args.conv_tol.or(params.conv_tol).unwrap_or(base.tol);
    let max_cycle = args.max_cycle.or(params.max_cycle).unwrap_or(base.max_cycle);
    let max_space = args.max_space.or(params.max_space).unwrap_or(base.max_space);
    let davidson = Davidson::new(tol, max_cycle).with_max_space(max_space);

    let solver = FciSolver::new(CachedStringIndexer::new(), davidson);
    let level_shift = args
        .level_shift
        .or(params.level_shift)
        .unwrap_or(solver.level_shift);

    info!("Davidson parameters:");
    info!("  Convergence threshold: {:.3e}", tol);
    info!("  Max cycles: {}", max_cycle);
    info!("  Max subspace: {}", davidson.max_space);
    info!("  Level shift: {:.3e}", level_shift);
    solver.with_level_shift(level_shift)
}

pub fn run_fci(mo: &MoIntegrals, nelec: Nelec, solver: &FciSolver) -> Result<FciSolution> {
    let solution = solver
        .kernel(&mo.h1e, &mo.eri, mo.norb(), nelec)
        .wrap_err("FCI kernel failed")?;
    Ok(solution)
}
