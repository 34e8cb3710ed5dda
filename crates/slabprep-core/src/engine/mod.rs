//! # Engine Module
//!
//! The numeric heart of slabprep: turning macroscopic box dimensions and target
//! densities into concrete lattices, and checking how closely the lattices realize the
//! requested densities.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Validated generation settings and their builder
//! - **Geometry** ([`geometry`]) - Wall thickness, feasibility checks, lattice spacings
//! - **Lattice** ([`lattice`]) - Integer-indexed enumeration of every region
//! - **Density** ([`density`]) - Requested vs. achieved number densities
//! - **Progress Monitoring** ([`progress`]) - Phase and region progress events
//! - **Error Handling** ([`error`]) - The engine's error taxonomy
//!
//! Everything here is synchronous and free of I/O; writing artifacts is left to the
//! workflows.

pub mod config;
pub mod density;
pub mod error;
pub mod geometry;
pub mod lattice;
pub mod progress;
