use crate::core::utils::format::plain_float;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Canonical parameter names.
///
/// The names double as variable names in the control-script template, which is why
/// they keep the spelling the template uses (`sig12`, `rcutLJ11`).
pub mod keys {
    pub const LX: &str = "Lx";
    pub const LY: &str = "Ly";
    pub const LZ: &str = "Lz";
    pub const RHO_WALL: &str = "rho_wall";
    pub const RHO_FLUID: &str = "rho_fluid";
    pub const SIGMA: &str = "sig12";
    pub const RCUT: &str = "rcutLJ11";
    pub const FLUID_GAP: &str = "fluid_gap";
    pub const SIMULATION_NAME: &str = "simulation_name";
    pub const DATA_FILE: &str = "data_file";
    pub const CONTROL_OUTPUT: &str = "box_output";
    pub const NODES: &str = "nodes";
    pub const PPN: &str = "ppn";
    pub const QUEUE: &str = "queue";
    pub const LAMMPS_EXE: &str = "lammps_exe";
    pub const RUN_LENGTH: &str = "nrun";
}

/// A single configuration value.
///
/// Values keep the kind they were written with so that the template rewriter can
/// reproduce integers as integers and strings verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl ParameterValue {
    /// Interprets a raw command-line value: integer first, then float, then text.
    pub fn parse_loose(raw: &str) -> Self {
        let raw = raw.trim();
        if let Ok(i) = raw.parse::<i64>() {
            Self::Integer(i)
        } else if let Ok(f) = raw.parse::<f64>() {
            Self::Float(f)
        } else {
            Self::Text(raw.to_string())
        }
    }

    /// Returns the numeric value, widening integers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(v) => f.write_str(&plain_float(*v)),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for ParameterValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for ParameterValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<&str> for ParameterValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

/// Named configuration values, ordered by name for deterministic iteration.
pub type ParameterMap = BTreeMap<String, ParameterValue>;

/// Per-variable count of decimal places used when rendering numeric values.
pub type DecimalsMap = BTreeMap<String, usize>;

/// Macroscopic description of the slab box and the two species.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParameters {
    pub lx: f64,
    pub ly: f64,
    pub lz: f64,
    pub rho_wall: f64,
    pub rho_fluid: f64,
    /// Species interaction length scale.
    pub sigma: f64,
    /// Interaction cutoff radius.
    pub rcut: f64,
    /// Z-extent of the fluid region.
    pub fluid_gap: f64,
}

impl SimulationParameters {
    /// Thickness of each wall: `(Lz - fluid_gap - 2 sigma) / 2`.
    pub fn wall_thickness(&self) -> f64 {
        (self.lz - self.fluid_gap - 2.0 * self.sigma) / 2.0
    }
}
