use super::atom::Species;
use nalgebra::{Point3, Vector3};
use std::fmt;

/// The three regions a slab box is partitioned into along Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegionKind {
    Fluid,
    BottomWall,
    TopWall,
}

impl RegionKind {
    /// Order in which regions are enumerated and atom ids are assigned.
    pub const GENERATION_ORDER: [RegionKind; 3] =
        [RegionKind::Fluid, RegionKind::BottomWall, RegionKind::TopWall];

    pub fn species(self) -> Species {
        match self {
            Self::Fluid => Species::Fluid,
            Self::BottomWall | Self::TopWall => Species::Wall,
        }
    }
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fluid => f.write_str("fluid"),
            Self::BottomWall => f.write_str("bottom wall"),
            Self::TopWall => f.write_str("top wall"),
        }
    }
}

/// A regular lattice filling one region of the box.
///
/// Site `(i, j, k)` sits at `origin + (i * step.x, j * step.y, k * step.z)` where
/// `i < columns` runs along X, `j < rows` along Y and `k < layers` along Z. The origin
/// already carries the half-step offset that keeps sites off the periodic boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct LatticeRegion {
    pub kind: RegionKind,
    pub origin: Point3<f64>,
    pub step: Vector3<f64>,
    pub columns: usize,
    pub rows: usize,
    pub layers: usize,
}

impl LatticeRegion {
    pub fn site_count(&self) -> usize {
        self.columns * self.rows * self.layers
    }

    /// Position of a single lattice site, computed from integer indices only.
    pub fn site(&self, column: usize, row: usize, layer: usize) -> Point3<f64> {
        Point3::new(
            self.origin.x + column as f64 * self.step.x,
            self.origin.y + row as f64 * self.step.y,
            self.origin.z + layer as f64 * self.step.z,
        )
    }

    /// Z coordinate of every layer, bottom to top.
    pub fn layer_heights(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.layers).map(move |k| self.origin.z + k as f64 * self.step.z)
    }

    /// All sites, layer by layer; within a layer rows advance slowest and columns fastest.
    pub fn sites(&self) -> impl Iterator<Item = Point3<f64>> + '_ {
        (0..self.layers).flat_map(move |k| {
            (0..self.rows).flat_map(move |j| (0..self.columns).map(move |i| self.site(i, j, k)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region() -> LatticeRegion {
        LatticeRegion {
            kind: RegionKind::BottomWall,
            origin: Point3::new(0.5, 0.5, 0.25),
            step: Vector3::new(1.0, 1.0, 0.5),
            columns: 3,
            rows: 2,
            layers: 4,
        }
    }

    #[test]
    fn walls_are_wall_species() {
        assert_eq!(RegionKind::Fluid.species(), Species::Fluid);
        assert_eq!(RegionKind::BottomWall.species(), Species::Wall);
        assert_eq!(RegionKind::TopWall.species(), Species::Wall);
    }

    #[test]
    fn sites_are_enumerated_columns_fastest() {
        let region = region();
        let sites: Vec<_> = region.sites().collect();
        assert_eq!(sites.len(), region.site_count());
        assert_eq!(sites[0], Point3::new(0.5, 0.5, 0.25));
        assert_eq!(sites[1], Point3::new(1.5, 0.5, 0.25));
        assert_eq!(sites[3], Point3::new(0.5, 1.5, 0.25));
        assert_eq!(sites[6], Point3::new(0.5, 0.5, 0.75));
        assert_eq!(*sites.last().unwrap(), Point3::new(2.5, 1.5, 1.75));
    }

    #[test]
    fn layer_heights_use_integer_indices() {
        let heights: Vec<_> = region().layer_heights().collect();
        assert_eq!(heights, vec![0.25, 0.75, 1.25, 1.75]);
    }
}
