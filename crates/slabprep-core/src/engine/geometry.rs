use crate::core::models::params::SimulationParameters;
use crate::core::models::region::{LatticeRegion, RegionKind};
use nalgebra::{Point3, Vector3};
use thiserror::Error;
use tracing::{debug, instrument};

/// Number of lattice layers in each wall.
pub const WALL_LAYERS: usize = 4;

/// Reasons a parameter set cannot be turned into a lattice.
#[derive(Debug, Error, PartialEq, Clone)]
pub enum GeometryError {
    #[error(
        "Infeasible geometry: wall thickness {wall_thickness} plus sigma {sigma} does not exceed the cutoff radius {rcut}"
    )]
    WallBelowCutoff {
        wall_thickness: f64,
        sigma: f64,
        rcut: f64,
    },

    #[error("Infeasible geometry: wall thickness {wall_thickness} is not positive")]
    NonPositiveWallThickness { wall_thickness: f64 },

    #[error("Infeasible geometry: wall spacing {spacing:.4} leaves no lattice sites along {axis}")]
    EmptyWallLattice { axis: &'static str, spacing: f64 },
}

/// Partition of the box into the fluid region and the two walls.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionLayout {
    pub box_extent: Vector3<f64>,
    pub wall_thickness: f64,
    pub fluid_gap: f64,
    pub requested_fluid_density: f64,
    pub requested_wall_density: f64,
    pub fluid: LatticeRegion,
    pub bottom_wall: LatticeRegion,
    pub top_wall: LatticeRegion,
}

impl RegionLayout {
    pub fn region(&self, kind: RegionKind) -> &LatticeRegion {
        match kind {
            RegionKind::Fluid => &self.fluid,
            RegionKind::BottomWall => &self.bottom_wall,
            RegionKind::TopWall => &self.top_wall,
        }
    }

    /// Regions in id-assignment order.
    pub fn regions(&self) -> impl Iterator<Item = &LatticeRegion> {
        RegionKind::GENERATION_ORDER
            .into_iter()
            .map(move |kind| self.region(kind))
    }

    pub fn fluid_volume(&self) -> f64 {
        self.fluid_gap * self.box_extent.x * self.box_extent.y
    }

    /// Combined volume of both walls.
    pub fn wall_volume(&self) -> f64 {
        2.0 * self.box_extent.x * self.box_extent.y * self.wall_thickness
    }
}

/// Number of sites `(k + 0.5) * step` that fall strictly below `extent`.
fn raster_count(extent: f64, step: f64) -> usize {
    let count = (extent / step - 0.5).ceil();
    if count > 0.0 { count as usize } else { 0 }
}

/// Computes wall thickness, lattice constants and per-region site counts.
///
/// The in-plane wall spacing is derived from `Lx` and reused along Y; the number of
/// wall rows along Y is however bounded by `Ly`, so no site leaves the box when the
/// two extents differ.
///
/// Fluid columns, rows and layers are `floor(extent / a)` so that the fluid block is
/// always a whole number of cells, whereas wall rows count the raster sites below `Ly`
/// because their spacing comes from `Lx` rather than `Ly`.
///
/// # Errors
///
/// Returns a [`GeometryError`] when the walls would be thinner than the interaction
/// range or too sparse to hold a single lattice site.
#[instrument(level = "debug", skip_all)]
pub fn plan(params: &SimulationParameters) -> Result<RegionLayout, GeometryError> {
    let wall_thickness = params.wall_thickness();
    if wall_thickness + params.sigma <= params.rcut {
        return Err(GeometryError::WallBelowCutoff {
            wall_thickness,
            sigma: params.sigma,
            rcut: params.rcut,
        });
    }
    if wall_thickness <= 0.0 {
        return Err(GeometryError::NonPositiveWallThickness { wall_thickness });
    }

    let approx_spacing = (4.0 / (params.rho_wall * wall_thickness)).sqrt();
    let wall_columns = (params.lx / approx_spacing).floor() as usize;
    if wall_columns == 0 {
        return Err(GeometryError::EmptyWallLattice {
            axis: "X",
            spacing: approx_spacing,
        });
    }
    if (params.ly / approx_spacing).floor() < 1.0 {
        return Err(GeometryError::EmptyWallLattice {
            axis: "Y",
            spacing: approx_spacing,
        });
    }
    let wall_spacing = params.lx / wall_columns as f64;
    let wall_rows = raster_count(params.ly, wall_spacing);
    let wall_layer_spacing = wall_thickness / WALL_LAYERS as f64;
    let wall_step = Vector3::new(wall_spacing, wall_spacing, wall_layer_spacing);

    let fluid_constant = (1.0 / params.rho_fluid).powf(1.0 / 3.0);
    let fluid_step = Vector3::repeat(fluid_constant);
    let fluid_origin_z = params.lz / 2.0 - params.fluid_gap / 2.0 + 0.5 * fluid_constant;

    debug!(
        wall_thickness,
        wall_spacing, wall_columns, wall_rows, fluid_constant, "Planned lattice constants"
    );

    let fluid = LatticeRegion {
        kind: RegionKind::Fluid,
        origin: Point3::new(0.5 * fluid_constant, 0.5 * fluid_constant, fluid_origin_z),
        step: fluid_step,
        columns: (params.lx / fluid_constant).floor() as usize,
        rows: (params.ly / fluid_constant).floor() as usize,
        layers: (params.fluid_gap / fluid_constant).floor() as usize,
    };

    let bottom_wall = LatticeRegion {
        kind: RegionKind::BottomWall,
        origin: Point3::new(
            0.5 * wall_spacing,
            0.5 * wall_spacing,
            0.5 * wall_layer_spacing,
        ),
        step: wall_step,
        columns: wall_columns,
        rows: wall_rows,
        layers: WALL_LAYERS,
    };

    let top_start = (params.lz - wall_thickness) - 0.5 * wall_layer_spacing;
    let top_wall = LatticeRegion {
        kind: RegionKind::TopWall,
        origin: Point3::new(
            0.5 * wall_spacing,
            0.5 * wall_spacing,
            top_start + 0.5 * wall_layer_spacing,
        ),
        ..bottom_wall.clone()
    };

    Ok(RegionLayout {
        box_extent: Vector3::new(params.lx, params.ly, params.lz),
        wall_thickness,
        fluid_gap: params.fluid_gap,
        requested_fluid_density: params.rho_fluid,
        requested_wall_density: params.rho_wall,
        fluid,
        bottom_wall,
        top_wall,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn reference() -> SimulationParameters {
        SimulationParameters {
            lx: 10.0,
            ly: 10.0,
            lz: 20.0,
            rho_wall: 0.75,
            rho_fluid: 0.8,
            sigma: 1.0,
            rcut: 1.5,
            fluid_gap: 8.0,
        }
    }

    #[test]
    fn reference_box_layout() {
        let layout = plan(&reference()).unwrap();
        assert_eq!(layout.wall_thickness, 5.0);
        assert!((layout.fluid.step.z - 1.0772).abs() < 1e-4);
        assert_eq!(layout.fluid.columns, 9);
        assert_eq!(layout.fluid.rows, 9);
        assert_eq!(layout.fluid.layers, 7);
        assert_eq!(layout.bottom_wall.columns, 9);
        assert_eq!(layout.bottom_wall.rows, 9);
        assert_eq!(layout.bottom_wall.layers, WALL_LAYERS);
        assert_eq!(layout.top_wall.site_count(), layout.bottom_wall.site_count());
        assert_eq!(layout.bottom_wall.step.z, 1.25);
    }

    #[test]
    fn regions_follow_generation_order() {
        let layout = plan(&reference()).unwrap();
        let kinds: Vec<_> = layout.regions().map(|r| r.kind).collect();
        assert_eq!(kinds, RegionKind::GENERATION_ORDER.to_vec());
    }

    #[test]
    fn wall_layers_stay_inside_their_slabs() {
        let layout = plan(&reference()).unwrap();
        let bottom: Vec<_> = layout.bottom_wall.layer_heights().collect();
        assert_eq!(bottom, vec![0.625, 1.875, 3.125, 4.375]);

        let top: Vec<_> = layout.top_wall.layer_heights().collect();
        assert_eq!(top, vec![15.0, 16.25, 17.5, 18.75]);
    }

    #[test]
    fn fluid_is_centred_in_the_gap() {
        let layout = plan(&reference()).unwrap();
        let first = layout.fluid.origin.z - 0.5 * layout.fluid.step.z;
        assert!((first - 6.0).abs() < 1e-12);
        let last = layout.fluid.layer_heights().last().unwrap();
        assert!(last < 14.0);
    }

    #[test]
    fn cutoff_check_runs_before_the_sign_check() {
        let params = SimulationParameters {
            fluid_gap: 18.5,
            ..reference()
        };
        assert!(params.wall_thickness() < 0.0);
        assert!(matches!(
            plan(&params),
            Err(GeometryError::WallBelowCutoff { .. })
        ));
    }

    #[test]
    fn wall_thickness_of_point_four_is_infeasible() {
        let params = SimulationParameters {
            fluid_gap: 17.2,
            ..reference()
        };
        assert!((params.wall_thickness() - 0.4).abs() < 1e-12);
        let err = plan(&params).unwrap_err();
        assert!(matches!(err, GeometryError::WallBelowCutoff { rcut, .. } if rcut == 1.5));
    }

    #[test]
    fn negative_wall_thickness_with_tiny_cutoff() {
        let params = SimulationParameters {
            fluid_gap: 18.5,
            rcut: 0.1,
            ..reference()
        };
        assert!(matches!(
            plan(&params),
            Err(GeometryError::NonPositiveWallThickness { .. })
        ));
    }

    #[test]
    fn sparse_walls_report_the_empty_axis() {
        let params = SimulationParameters {
            rho_wall: 0.001,
            ..reference()
        };
        assert!(matches!(
            plan(&params),
            Err(GeometryError::EmptyWallLattice { axis: "X", .. })
        ));
    }

    #[test]
    fn wall_rows_respect_a_shorter_y_extent() {
        let params = SimulationParameters {
            ly: 6.0,
            ..reference()
        };
        let layout = plan(&params).unwrap();
        let spacing = layout.bottom_wall.step.y;
        assert!((spacing - 10.0 / 9.0).abs() < 1e-12);
        assert_eq!(layout.bottom_wall.rows, 5);
        let last_row = layout.bottom_wall.site(0, layout.bottom_wall.rows - 1, 0);
        assert!(last_row.y < 6.0);
    }

    #[test]
    fn fluid_counts_floor_even_when_a_raster_would_fit_one_more_site() {
        let params = SimulationParameters {
            lx: 10.6,
            ..reference()
        };
        let layout = plan(&params).unwrap();
        let step = layout.fluid.step.x;
        assert_eq!(raster_count(params.lx, step), 10);
        assert_eq!(layout.fluid.columns, 9);
        assert_eq!(layout.fluid.rows, 9);
        assert_eq!(layout.bottom_wall.columns, 10);
    }

    #[test]
    fn volumes_match_region_extents() {
        let layout = plan(&reference()).unwrap();
        assert_eq!(layout.fluid_volume(), 800.0);
        assert_eq!(layout.wall_volume(), 1000.0);
    }

    #[test]
    fn raster_count_excludes_the_far_boundary() {
        assert_eq!(raster_count(10.0, 1.0), 10);
        assert_eq!(raster_count(10.0, 4.0), 2);
        assert_eq!(raster_count(1.0, 4.0), 0);
    }
}
