//! Command-line argument parsing for FCI calculations

use clap::Parser;

/// Direct-CI FCI calculation with YAML configuration
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "example/h6_fci.yaml")]
    pub config_file: String,

    /// Override output file: (default stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Molecular charge (overrides config file)
    #[arg(long)]
    pub charge: Option<i32>,

    /// Override maximum Davidson iterations
    #[arg(long)]
    pub max_cycle: Option<usize>,

    /// Override eigenvalue convergence threshold
    #[arg(long)]
    pub conv_tol: Option<f64>,

    /// Override Davidson subspace size before collapse
    #[arg(long)]
    pub max_space: Option<usize>,

    /// Override preconditioner level shift
    #[arg(long)]
    pub level_shift: Option<f64>,

    /// Also build and report the 1- and 2-particle density matrices
    #[arg(long)]
    pub rdm: bool,
}
