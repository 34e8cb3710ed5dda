//! Data models describing a slab simulation: the parameter mapping, the particle
//! species, individual atoms, lattice regions and complete configurations.

pub mod atom;
pub mod configuration;
pub mod params;
pub mod region;
