use super::atom::{Atom, Species};
use nalgebra::Vector3;

pub const DEFAULT_TITLE: &str = "LAMMPS Description";

/// A complete particle configuration: an orthogonal box anchored at the origin,
/// the species mass table and the ordered atom list.
#[derive(Debug, Clone, PartialEq)]
pub struct SlabConfiguration {
    pub title: String,
    pub box_extent: Vector3<f64>,
    pub masses: Vec<(Species, f64)>,
    pub atoms: Vec<Atom>,
}

impl SlabConfiguration {
    /// Builds a configuration with the default title and unit masses for both species.
    pub fn new(box_extent: Vector3<f64>, atoms: Vec<Atom>) -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            box_extent,
            masses: Species::ALL.iter().map(|s| (*s, s.mass())).collect(),
            atoms,
        }
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn count_of(&self, species: Species) -> usize {
        self.atoms.iter().filter(|a| a.species == species).count()
    }

    pub fn atoms_of(&self, species: Species) -> impl Iterator<Item = &Atom> + '_ {
        self.atoms.iter().filter(move |a| a.species == species)
    }
}
