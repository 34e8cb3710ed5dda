//! Provides input/output for the particle configuration formats produced and consumed
//! by slabprep, plus the sinks that generated artifacts are written through.
//!
//! Formats share the [`traits::StructureFile`] interface so that reading and writing
//! from paths, readers and writers behaves the same for every format.

pub mod lammps;
pub mod sink;
pub mod traits;
pub mod xyz;
