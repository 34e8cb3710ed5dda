use super::config::ConfigError;
use super::geometry::GeometryError;
use crate::core::io::lammps::DataFileError;
use crate::core::script::TemplateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Failed to render data file: {0}")]
    DataFile(#[from] DataFileError),

    #[error("Control script declares no run length variable '{0}'")]
    MissingRunLength(String),

    #[error("No checkpoint named '{0}<sep><step>' was found")]
    NoCheckpoint(String),

    #[error("Failed to write artifact '{artifact}': {source}")]
    Artifact {
        artifact: String,
        #[source]
        source: std::io::Error,
    },
}
