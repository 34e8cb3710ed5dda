use super::geometry::RegionLayout;
use super::progress::{Progress, ProgressReporter};
use crate::core::models::atom::Atom;
use crate::core::models::configuration::SlabConfiguration;
use crate::core::models::region::RegionKind;
use tracing::{debug, info, instrument, warn};

/// Number of atoms realized in each region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegionCounts {
    pub fluid: usize,
    pub bottom_wall: usize,
    pub top_wall: usize,
}

impl RegionCounts {
    pub fn wall(&self) -> usize {
        self.bottom_wall + self.top_wall
    }

    pub fn total(&self) -> usize {
        self.fluid + self.wall()
    }

    fn record(&mut self, kind: RegionKind, placed: usize) {
        match kind {
            RegionKind::Fluid => self.fluid = placed,
            RegionKind::BottomWall => self.bottom_wall = placed,
            RegionKind::TopWall => self.top_wall = placed,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedLattice {
    pub configuration: SlabConfiguration,
    pub counts: RegionCounts,
}

/// Enumerates every lattice site of the layout as an atom.
///
/// Regions are visited fluid, bottom wall, top wall, and ids run from 1 without gaps
/// in that order.
#[instrument(skip_all, name = "lattice_generation")]
pub fn generate(layout: &RegionLayout, reporter: &ProgressReporter) -> GeneratedLattice {
    let capacity: usize = layout.regions().map(|r| r.site_count()).sum();
    let mut atoms = Vec::with_capacity(capacity);
    let mut counts = RegionCounts::default();

    for region in layout.regions() {
        reporter.report(Progress::RegionStart {
            region: region.kind,
            sites: region.site_count() as u64,
        });

        let species = region.kind.species();
        let before = atoms.len();
        for position in region.sites() {
            let id = atoms.len() + 1;
            atoms.push(Atom::new(id, species, position));
        }
        let placed = atoms.len() - before;
        counts.record(region.kind, placed);
        debug!(region = %region.kind, placed, "Region enumerated");

        reporter.report(Progress::RegionFinish {
            region: region.kind,
            placed: placed as u64,
        });
    }

    if counts.fluid == 0 {
        warn!("The fluid gap is narrower than one fluid lattice spacing; no fluid atoms were placed.");
    }
    info!(
        fluid = counts.fluid,
        wall = counts.wall(),
        total = counts.total(),
        "Lattice generation complete."
    );

    GeneratedLattice {
        configuration: SlabConfiguration::new(layout.box_extent, atoms),
        counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Species;
    use crate::core::models::params::SimulationParameters;
    use crate::engine::geometry::{plan, tests::reference};
    use std::sync::{Arc, Mutex};

    fn reference_lattice() -> GeneratedLattice {
        generate(&plan(&reference()).unwrap(), &ProgressReporter::new())
    }

    #[test]
    fn reference_box_counts() {
        let lattice = reference_lattice();
        assert_eq!(lattice.counts.fluid, 9 * 9 * 7);
        assert_eq!(lattice.counts.bottom_wall, 9 * 9 * 4);
        assert_eq!(lattice.counts.top_wall, 9 * 9 * 4);
        assert_eq!(lattice.configuration.atom_count(), lattice.counts.total());
    }

    #[test]
    fn ids_are_contiguous_from_one() {
        let lattice = reference_lattice();
        for (index, atom) in lattice.configuration.atoms.iter().enumerate() {
            assert_eq!(atom.id, index + 1);
        }
    }

    #[test]
    fn species_partition_follows_regions() {
        let lattice = reference_lattice();
        let atoms = &lattice.configuration.atoms;
        let fluid = lattice.counts.fluid;
        assert!(atoms[..fluid].iter().all(|a| a.species == Species::Fluid));
        assert!(atoms[fluid..].iter().all(|a| a.species == Species::Wall));
        assert_eq!(
            lattice.configuration.count_of(Species::Wall),
            lattice.counts.wall()
        );
    }

    #[test]
    fn atoms_lie_inside_the_box() {
        let params = SimulationParameters {
            lx: 12.0,
            ly: 7.5,
            ..reference()
        };
        let lattice = generate(&plan(&params).unwrap(), &ProgressReporter::new());
        for atom in &lattice.configuration.atoms {
            let p = atom.position;
            assert!(p.x > 0.0 && p.x < 12.0, "x out of box: {p}");
            assert!(p.y > 0.0 && p.y < 7.5, "y out of box: {p}");
            assert!(p.z > 0.0 && p.z < 20.0, "z out of box: {p}");
        }
    }

    #[test]
    fn fluid_stays_between_the_walls() {
        let lattice = reference_lattice();
        for atom in lattice.configuration.atoms_of(Species::Fluid) {
            assert!(atom.position.z > 6.0 && atom.position.z < 14.0);
        }
    }

    #[test]
    fn generation_is_deterministic() {
        assert_eq!(reference_lattice(), reference_lattice());
    }

    #[test]
    fn narrow_gap_yields_no_fluid() {
        let params = SimulationParameters {
            fluid_gap: 0.5,
            ..reference()
        };
        let lattice = generate(&plan(&params).unwrap(), &ProgressReporter::new());
        assert_eq!(lattice.counts.fluid, 0);
        assert!(lattice.counts.wall() > 0);
        assert_eq!(lattice.configuration.atoms[0].id, 1);
    }

    #[test]
    fn reports_each_region_in_order() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let reporter = ProgressReporter::with_callback(Box::new(move |p| {
            if let Progress::RegionFinish { region, placed } = p {
                sink.lock().unwrap().push((region, placed));
            }
        }));
        generate(&plan(&reference()).unwrap(), &reporter);
        assert_eq!(
            *events.lock().unwrap(),
            vec![
                (RegionKind::Fluid, 567),
                (RegionKind::BottomWall, 324),
                (RegionKind::TopWall, 324),
            ]
        );
    }
}
