mod geometry;
mod report;
mod runner;

pub use geometry::{build_molecule, Molecule, BOHR};
pub use report::{natural_occupations, report_summary, FciReport};
pub use runner::{build_mo_integrals, configure_solver, resolve_nelec, run_fci, MoIntegrals};

use crate::config::{Args, Config};
use crate::io::{setup_output, write_summary};
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use std::fs;
use tracing::info;

pub struct FciApplication {
    args: Args,
    config: Config,
}

impl FciApplication {
    pub fn from_cli() -> Result<Self> {
        let args = Args::parse();
        let config = load_config(&args.config_file)?;
        Ok(Self { args, config })
    }

    pub fn run(self) -> Result<()> {
        setup_output(self.args.output.as_deref());
        info!("Configuration loaded:\n{:?}", self.config);

        let report = run_calculation(&self.args, &self.config)?;
        write_summary(&mut std::io::stdout().lock(), &report)?;
        Ok(())
    }
}

pub fn load_config(path: &str) -> Result<Config> {
    let config_content = fs::read_to_string(path)
        .wrap_err_with(|| format!("Unable to read configuration file: {}", path))?;

    let config = serde_yml::from_str::<Config>(&config_content)
        .wrap_err("Failed to parse configuration file")?
        .with_defaults();

    Ok(config)
}

/// Geometry, integrals, FCI and optional density matrices for one input.
pub fn run_calculation(args: &Args, config: &Config) -> Result<FciReport> {
    let molecule = build_molecule(config)?;
    let basis_name = config.basis.as_deref().unwrap_or(::basis::Sto3G::NAME);
    let mo = build_mo_integrals(&molecule, basis_name)?;
    let nelec = resolve_nelec(&molecule, args, config)?;
    info!("{} atoms, {} orbitals, electrons {}", molecule.natoms(), mo.norb(), nelec);

    let solver = configure_solver(args, config);
    let solution = run_fci(&mo, nelec, &solver)?;

    let mut report = FciReport::new(&mo, &solution);
    if args.rdm || config.rdm.unwrap_or(false) {
        report = report.with_density_matrices(&mo, &solution)?;
    }
    report_summary(&report, &mo);
    Ok(report)
}
