//! # Core Module
//!
//! Fundamental building blocks shared by the generation engine and the workflows.
//!
//! ## Architecture
//!
//! - **Data Models** ([`models`]) - Parameters, atoms, species and lattice regions
//! - **File I/O** ([`io`]) - LAMMPS data files, species-split XYZ files and artifact sinks
//! - **Control Scripts** ([`script`]) - Template rewriting, submission scripts and the
//!   restart pipeline
//! - **Cluster Metadata** ([`cluster`]) - Node/queue tables and checkpoint discovery
//! - **Utilities** ([`utils`]) - Number formatting and run naming

pub mod cluster;
pub mod io;
pub mod models;
pub mod script;
pub mod utils;
