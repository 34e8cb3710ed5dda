use nalgebra::Point3;
use std::fmt;

/// The two particle species of a slab simulation.
///
/// The discriminant is the atom type written to the LAMMPS data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Species {
    /// Mobile particles filling the gap between the walls.
    Fluid = 1,
    /// Particles forming the two confining walls.
    Wall = 2,
}

impl Species {
    /// All species in atom-type order.
    pub const ALL: [Species; 2] = [Species::Fluid, Species::Wall];

    /// The numeric atom type used in data files.
    pub fn type_id(self) -> u8 {
        self as u8
    }

    /// Particle mass in reduced units.
    pub fn mass(self) -> f64 {
        1.0
    }

    pub fn from_type_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Self::Fluid),
            2 => Some(Self::Wall),
            _ => None,
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fluid => f.write_str("fluid"),
            Self::Wall => f.write_str("wall"),
        }
    }
}

/// A placed particle. Ids are 1-based and contiguous across a configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub id: usize,
    pub species: Species,
    pub position: Point3<f64>,
}

impl Atom {
    pub fn new(id: usize, species: Species, position: Point3<f64>) -> Self {
        Self {
            id,
            species,
            position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_ids_match_data_file_convention() {
        assert_eq!(Species::Fluid.type_id(), 1);
        assert_eq!(Species::Wall.type_id(), 2);
        assert_eq!(Species::from_type_id(2), Some(Species::Wall));
        assert_eq!(Species::from_type_id(3), None);
    }
}
