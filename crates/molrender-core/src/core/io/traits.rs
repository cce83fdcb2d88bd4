use super::error::StructureFileError;
use crate::core::models::structure::Structure;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Common interface of the structure file encodings.
///
/// A file holds one or more laid-out structures. Every structure read is validated
/// before it is returned, so callers never see dangling atom references.
pub trait StructureFile {
    /// Reads every structure from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or decoding fails, or if a structure is invalid.
    fn read_from(reader: &mut impl BufRead) -> Result<Vec<Structure>, StructureFileError>;

    /// Writes structures to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    fn write_to(structures: &[Structure], writer: &mut impl Write)
    -> Result<(), StructureFileError>;

    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Structure>, StructureFileError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    fn write_to_path<P: AsRef<Path>>(
        structures: &[Structure],
        path: P,
    ) -> Result<(), StructureFileError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(structures, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

pub(crate) fn validate_all(structures: &[Structure]) -> Result<(), StructureFileError> {
    for (index, structure) in structures.iter().enumerate() {
        structure
            .validate()
            .map_err(|source| StructureFileError::InvalidStructure {
                index,
                name: structure.name.clone(),
                source,
            })?;
    }
    Ok(())
}
