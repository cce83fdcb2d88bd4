use super::error::StructureFileError;
use super::traits::{StructureFile, validate_all};
use crate::core::models::structure::Structure;
use serde_json::Value;
use std::io::{BufRead, Write};

/// JSON structure files: an array of structures or a single structure object.
pub struct JsonFile;

impl StructureFile for JsonFile {
    fn read_from(reader: &mut impl BufRead) -> Result<Vec<Structure>, StructureFileError> {
        let value: Value = serde_json::from_reader(reader)?;
        let structures = match value {
            Value::Array(_) => serde_json::from_value::<Vec<Structure>>(value)?,
            other => vec![serde_json::from_value::<Structure>(other)?],
        };
        validate_all(&structures)?;
        Ok(structures)
    }

    fn write_to(
        structures: &[Structure],
        writer: &mut impl Write,
    ) -> Result<(), StructureFileError> {
        serde_json::to_writer_pretty(&mut *writer, structures)?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::structure::{StructureAtom, StructureBond};
    use crate::core::models::bond::BondOrder;
    use std::io::BufReader;

    #[test]
    fn reads_array_and_single_object() {
        let many = r#"[{"name": "a", "atoms": [{"label": "N", "pos": [0, 0]}]}, {"name": "b"}]"#;
        let one = r#"{"name": "c", "properties": {"ID": "7"}}"#;
        let structures = JsonFile::read_from(&mut BufReader::new(many.as_bytes())).unwrap();
        assert_eq!(structures.len(), 2);
        assert_eq!(structures[0].atoms[0].label, "N");
        let structures = JsonFile::read_from(&mut BufReader::new(one.as_bytes())).unwrap();
        assert_eq!(structures.len(), 1);
        assert_eq!(structures[0].property("ID"), Some("7"));
    }

    #[test]
    fn rejects_unknown_element() {
        let content = r#"{"name": "x", "atoms": [{"label": "Qq", "pos": [0, 0]}]}"#;
        let err = JsonFile::read_from(&mut BufReader::new(content.as_bytes())).unwrap_err();
        assert!(matches!(err, StructureFileError::InvalidStructure { .. }));
    }

    #[test]
    fn written_structures_read_back_equal() {
        let mut s = Structure::new("ethanol");
        s.atoms.push(StructureAtom::new("C", 0.0, 0.0));
        s.atoms.push(StructureAtom::new("C", 0.866, 0.5));
        s.atoms.push(StructureAtom::new("O", 1.732, 0.0));
        s.bonds.push(StructureBond::new(0, 1, BondOrder::Single));
        s.bonds.push(StructureBond::new(1, 2, BondOrder::Single));

        let mut buf = Vec::new();
        JsonFile::write_to(std::slice::from_ref(&s), &mut buf).unwrap();
        let reread = JsonFile::read_from(&mut BufReader::new(buf.as_slice())).unwrap();
        assert_eq!(reread, vec![s]);
    }
}
