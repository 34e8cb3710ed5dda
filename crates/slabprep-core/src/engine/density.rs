use super::geometry::RegionLayout;
use super::lattice::RegionCounts;
use std::fmt;

/// Deviation above which the generate workflow warns about a poorly realized density.
pub const DENSITY_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeciesDensity {
    pub requested: f64,
    pub achieved: f64,
    pub count: usize,
    pub volume: f64,
}

impl SpeciesDensity {
    fn new(requested: f64, count: usize, volume: f64) -> Self {
        let achieved = if volume > 0.0 {
            count as f64 / volume
        } else {
            0.0
        };
        Self {
            requested,
            achieved,
            count,
            volume,
        }
    }

    /// `|achieved - requested| / requested`.
    pub fn relative_deviation(&self) -> f64 {
        (self.achieved - self.requested).abs() / self.requested
    }

    pub fn within_tolerance(&self) -> bool {
        self.relative_deviation() <= DENSITY_TOLERANCE
    }
}

/// Requested versus achieved number densities of both species.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensityReport {
    pub fluid: SpeciesDensity,
    pub wall: SpeciesDensity,
}

impl DensityReport {
    /// Renders the four-line diagnostics file.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DensityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Target fluid density: {:.4}", self.fluid.requested)?;
        writeln!(f, "Actual fluid density: {:.4}", self.fluid.achieved)?;
        writeln!(f, "Target wall density: {:.4}", self.wall.requested)?;
        writeln!(f, "Actual wall density: {:.4}", self.wall.achieved)
    }
}

/// Compares realized counts against the densities the layout was planned for.
pub fn audit(layout: &RegionLayout, counts: &RegionCounts) -> DensityReport {
    DensityReport {
        fluid: SpeciesDensity::new(
            layout.requested_fluid_density,
            counts.fluid,
            layout.fluid_volume(),
        ),
        wall: SpeciesDensity::new(
            layout.requested_wall_density,
            counts.wall(),
            layout.wall_volume(),
        ),
    }
}
