use crate::config::Config;
use ::basis::Nucleus;
use color_eyre::eyre::{eyre, Result};
use nalgebra::Vector3;
use periodic_table_on_an_enum::Element;
use tracing::info;

/// Ångström per Bohr
pub const BOHR: f64 = 0.52917721092;

/// Atoms of the system, coordinates in Bohr.
#[derive(Debug, Clone)]
pub struct Molecule {
    pub elements: Vec<Element>,
    pub coords: Vec<Vector3<f64>>,
}

impl Molecule {
    pub fn natoms(&self) -> usize {
        self.elements.len()
    }

    pub fn nuclei(&self) -> Vec<Nucleus> {
        self.elements
            .iter()
            .zip(&self.coords)
            .map(|(elem, &position)| Nucleus {
                charge: elem.get_atomic_number() as u32,
                position,
            })
            .collect()
    }

    /// Sum of nuclear charges, the electron count of the neutral molecule.
    pub fn nuclear_charge(&self) -> usize {
        self.elements
            .iter()
            .map(|e| e.get_atomic_number() as usize)
            .sum()
    }
}

/// Build the molecule defined in the YAML configuration (Å) in Bohr.
pub fn build_molecule(config: &Config) -> Result<Molecule> {
    info!("\nPreparing geometry...");

    let mut elements = Vec::with_capacity(config.geometry.len());
    let mut coords = Vec::with_capacity(config.geometry.len());

    for atom in &config.geometry {
        let element = Element::from_symbol(&atom.element)
            .ok_or_else(|| eyre!("Invalid element symbol: {}", atom.element))?;
        let [x, y, z] = atom.coords;
        elements.push(element);
        coords.push(Vector3::new(x, y, z) / BOHR);
    }
    if elements.is_empty() {
        return Err(eyre!("Geometry contains no atoms"));
    }

    for (elem, r) in elements.iter().zip(&coords) {
        info!(
            "  {:>2} [{:>12.6}, {:>12.6}, {:>12.6}] Bohr",
            elem.get_symbol(),
            r.x,
            r.y,
            r.z
        );
    }
    Ok(Molecule { elements, coords })
}
