use super::config::ConfigError;
use crate::core::models::structure::StructureError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid structure: {source}")]
    InvalidStructure {
        #[from]
        source: StructureError,
    },

    #[error("Invalid render options: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Degenerate geometry at {location}: {reason}")]
    DegenerateGeometry {
        location: String,
        reason: &'static str,
    },
}
