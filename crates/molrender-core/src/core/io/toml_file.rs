use super::error::StructureFileError;
use super::traits::{StructureFile, validate_all};
use crate::core::models::structure::Structure;
use serde::Serialize;
use std::io::{BufRead, Write};

const STRUCTURE_TABLE: &str = "structure";

#[derive(Serialize)]
struct TomlDocument<'a> {
    structure: &'a [Structure],
}

/// TOML structure files: either one structure at the top level or any number of
/// `[[structure]]` tables.
pub struct TomlFile;

impl StructureFile for TomlFile {
    fn read_from(reader: &mut impl BufRead) -> Result<Vec<Structure>, StructureFileError> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        let mut table: toml::Table = toml::from_str(&content)?;

        let structures = match table.remove(STRUCTURE_TABLE) {
            Some(value) => value.try_into::<Vec<Structure>>()?,
            None => vec![toml::Value::Table(table).try_into::<Structure>()?],
        };
        validate_all(&structures)?;
        Ok(structures)
    }

    fn write_to(
        structures: &[Structure],
        writer: &mut impl Write,
    ) -> Result<(), StructureFileError> {
        let content = toml::to_string(&TomlDocument {
            structure: structures,
        })?;
        writer.write_all(content.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::bond::BondOrder;
    use std::io::BufReader;

    const TWO_STRUCTURES: &str = r#"
[[structure]]
name = "ethene"
atoms = [
    { label = "C", pos = [0.0, 0.0] },
    { label = "C", pos = [1.0, 0.0] },
]
bonds = [{ begin = 0, end = 1, order = "double" }]

[[structure]]
name = "water"
atoms = [{ label = "O", pos = [0.0, 0.0] }]
"#;

    #[test]
    fn reads_structure_array() {
        let mut reader = BufReader::new(TWO_STRUCTURES.as_bytes());
        let structures = TomlFile::read_from(&mut reader).unwrap();
        assert_eq!(structures.len(), 2);
        assert_eq!(structures[0].name, "ethene");
        assert_eq!(structures[0].bonds[0].order, BondOrder::Double);
        assert_eq!(structures[1].atoms[0].label, "O");
    }

    #[test]
    fn reads_single_top_level_structure() {
        let content = r#"
name = "methane"
atoms = [{ label = "C", pos = [0.0, 0.0] }]
"#;
        let mut reader = BufReader::new(content.as_bytes());
        let structures = TomlFile::read_from(&mut reader).unwrap();
        assert_eq!(structures.len(), 1);
        assert_eq!(structures[0].name, "methane");
    }

    #[test]
    fn rejects_dangling_bond() {
        let content = r#"
name = "broken"
atoms = [{ label = "C", pos = [0.0, 0.0] }]
bonds = [{ begin = 0, end = 3 }]
"#;
        let mut reader = BufReader::new(content.as_bytes());
        let err = TomlFile::read_from(&mut reader).unwrap_err();
        assert!(matches!(
            err,
            StructureFileError::InvalidStructure { index: 0, .. }
        ));
    }

    #[test]
    fn rejects_unknown_fields() {
        let content = r#"
name = "typo"
atom = []
"#;
        let mut reader = BufReader::new(content.as_bytes());
        assert!(matches!(
            TomlFile::read_from(&mut reader),
            Err(StructureFileError::TomlDecode(_))
        ));
    }

    #[test]
    fn file_round_trip_through_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("set.toml");
        let mut reader = BufReader::new(TWO_STRUCTURES.as_bytes());
        let structures = TomlFile::read_from(&mut reader).unwrap();

        TomlFile::write_to_path(&structures, &path).unwrap();
        let reread = TomlFile::read_from_path(&path).unwrap();
        assert_eq!(reread, structures);
    }
}
