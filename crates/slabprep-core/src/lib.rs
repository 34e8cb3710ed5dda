//! # slabprep Core Library
//!
//! Prepares initial configurations for layered wall–fluid molecular-dynamics slab
//! simulations and derives the control scripts that drive them, including
//! continuation scripts that resume a run from a checkpoint.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture so that every numeric and textual
//! transform can be tested in isolation from the filesystem.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`SimulationParameters`, `Atom`,
//!   `LatticeRegion`), the on-disk formats (LAMMPS data files, XYZ exports), the
//!   control-script transforms and the cluster metadata tables.
//!
//! - **[`engine`]: The Logic Core.** Geometry planning, lattice enumeration and the
//!   density audit, together with the generation configuration, the error taxonomy and
//!   progress reporting.
//!
//! - **[`workflows`]: The Public API.** Entry points that tie `engine` and `core`
//!   together: generating a complete run folder and planning the continuation of an
//!   unfinished run.

pub mod core;
pub mod engine;
pub mod workflows;
