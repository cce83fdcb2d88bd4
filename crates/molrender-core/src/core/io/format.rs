use super::error::StructureFileError;
use super::json_file::JsonFile;
use super::toml_file::TomlFile;
use super::traits::StructureFile;
use crate::core::models::structure::Structure;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureFormat {
    Toml,
    Json,
}

impl FromStr for StructureFormat {
    type Err = StructureFileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            _ => Err(StructureFileError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for StructureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Toml => write!(f, "toml"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl StructureFormat {
    pub fn from_path(path: &Path) -> Result<Self, StructureFileError> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| StructureFileError::UnsupportedFormat(path.display().to_string()))?
            .parse()
    }

    pub fn read_path(self, path: &Path) -> Result<Vec<Structure>, StructureFileError> {
        match self {
            Self::Toml => TomlFile::read_from_path(path),
            Self::Json => JsonFile::read_from_path(path),
        }
    }
}

/// Reads every structure from `path`, choosing the decoder by file extension.
pub fn read_structures(path: &Path) -> Result<Vec<Structure>, StructureFileError> {
    StructureFormat::from_path(path)?.read_path(path)
}
