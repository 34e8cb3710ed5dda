//! # Workflows Module
//!
//! Top-level entry points of the slabprep library.
//!
//! ## Architecture
//!
//! - **Generation Workflow** ([`generate`]) - Plans the lattice, enumerates the atoms,
//!   audits the densities and renders every artifact of a run folder. Artifacts reach
//!   the sink only after all of them were produced successfully.
//! - **Resume Workflow** ([`resume`]) - Decides from the checkpoints of a run whether
//!   it is finished and, if not, derives its continuation script.

pub mod generate;
pub mod resume;
