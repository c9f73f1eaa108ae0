//! FCI Calculation Command-Line Interface
//!
//! This is the main entry point for running FCI calculations with YAML configuration.

use color_eyre::eyre::Result;
use fci::app::FciApplication;

fn main() -> Result<()> {
    color_eyre::install()?;
    FciApplication::from_cli()?.run()
}
