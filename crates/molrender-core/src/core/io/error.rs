use crate::core::models::structure::StructureError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StructureFileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML decode error: {0}")]
    TomlDecode(#[from] toml::de::Error),

    #[error("TOML encode error: {0}")]
    TomlEncode(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid structure #{index} ('{name}'): {source}")]
    InvalidStructure {
        index: usize,
        name: String,
        #[source]
        source: StructureError,
    },

    #[error("Unsupported structure file format: '{0}'")]
    UnsupportedFormat(String),
}
