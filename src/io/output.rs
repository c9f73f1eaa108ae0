//! Output formatting and logging utilities

use crate::app::FciReport;
use color_eyre::eyre::Result;
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{
    fmt::format::Writer, fmt::layer, fmt::time::FormatTime, layer::SubscriberExt,
    util::SubscriberInitExt, Registry,
};

/// Wall time since the logger was installed, in seconds
struct ElapsedTimer {
    start: Instant,
}

impl FormatTime for ElapsedTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{:>9.2}s", self.start.elapsed().as_secs_f64())
    }
}

/// Setup output logging to file or stdout
///
/// A second call is a no-op, the first subscriber stays installed.
pub fn setup_output(output_path: Option<&str>) {
    let timer = ElapsedTimer {
        start: Instant::now(),
    };
    match output_path.map(|path| (path, File::create(path))) {
        Some((path, Ok(log))) => {
            let file_layer = layer()
                .with_writer(Arc::new(log))
                .with_timer(timer)
                .with_ansi(false);
            if Registry::default().with(file_layer).try_init().is_ok() {
                info!("Output will be written to: {}", path);
            }
        }
        Some((path, Err(err))) => {
            eprintln!("Could not create output file {}: {}", path, err);
        }
        None => {
            let stdout_layer = layer()
                .with_writer(std::io::stdout)
                .with_timer(timer)
                .with_ansi(true);
            let _ = Registry::default().with(stdout_layer).try_init();
        }
    }
}

/// Write the final energies and, when present, natural occupations
pub fn write_summary<W: Write>(writer: &mut W, report: &FciReport) -> Result<()> {
    writeln!(writer, "FCI Summary")?;
    writeln!(writer, "===========\n")?;
    writeln!(writer, "Orbitals:            {}", report.norb)?;
    writeln!(writer, "Electrons:           {}", report.nelec)?;
    writeln!(writer, "Converged:           {}", report.converged)?;
    writeln!(writer, "Nuclear repulsion:   {:>18.10} au", report.e_nuc)?;
    writeln!(writer, "Electronic energy:   {:>18.10} au", report.e_elec)?;
    writeln!(writer, "Total energy:        {:>18.10} au", report.e_tot)?;

    if let Some(occ) = &report.natural_occupations {
        writeln!(writer, "\nNatural orbital occupations:")?;
        for (i, n) in occ.iter().enumerate() {
            writeln!(writer, "{:>4} {:>12.8}", i + 1, n)?;
        }
    }
    Ok(())
}
