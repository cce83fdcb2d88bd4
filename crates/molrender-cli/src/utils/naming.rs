//! Output file naming and per-structure comments.

use crate::cli::PrepareArgs;
use crate::error::{CliError, Result};
use molrender::core::models::structure::Structure;
use std::path::PathBuf;

pub const ID_PLACEHOLDER: &str = "%s";

/// Rejects a template that would make several structures overwrite one file.
pub fn validate_template(template: &str, count: usize) -> Result<()> {
    if count > 1 && !template.contains(ID_PLACEHOLDER) {
        return Err(CliError::Argument(format!(
            "Output '{}' must contain '{}' when the input holds {} structures.",
            template, ID_PLACEHOLDER, count
        )));
    }
    Ok(())
}

/// Identifier of a structure: the `id_field` property, or its zero-based number.
pub fn structure_id(structure: &Structure, index: usize, id_field: Option<&str>) -> Result<String> {
    match id_field {
        None => Ok(index.to_string()),
        Some(field) => structure
            .property(field)
            .map(str::to_string)
            .ok_or_else(|| {
                CliError::Argument(format!(
                    "Structure '{}' has no '{}' property.",
                    structure.name, field
                ))
            }),
    }
}

/// Substitutes `id` into the template. Separators and `..` in the id are replaced with
/// `_` so a property value cannot move the file out of the template's directory.
pub fn output_path(template: &str, id: &str) -> PathBuf {
    PathBuf::from(template.replace(ID_PLACEHOLDER, &file_name_safe(id)))
}

fn file_name_safe(id: &str) -> String {
    id.chars()
        .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
        .collect::<String>()
        .replace("..", "__")
}

/// Where the comment of each structure comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentSource {
    /// The canvas comment, the same for every structure.
    Fixed,
    Field(String),
    Name,
}

impl CommentSource {
    pub fn from_args(args: &PrepareArgs) -> Self {
        match (&args.comment_field, args.comment_name) {
            (Some(field), _) => Self::Field(field.clone()),
            (None, true) => Self::Name,
            (None, false) => Self::Fixed,
        }
    }

    pub fn resolve<'a>(&self, structure: &'a Structure, fixed: &'a str) -> &'a str {
        match self {
            Self::Fixed => fixed,
            Self::Field(field) => structure.property(field).unwrap_or_default(),
            Self::Name => &structure.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged(name: &str, id: Option<&str>) -> Structure {
        let mut s = Structure::new(name);
        if let Some(id) = id {
            s.properties.insert("ID".to_string(), id.to_string());
        }
        s
    }

    #[test]
    fn template_without_placeholder_is_rejected_for_batches() {
        assert!(validate_template("out.json", 1).is_ok());
        assert!(validate_template("out_%s.json", 4).is_ok());
        assert!(matches!(
            validate_template("out.json", 2),
            Err(CliError::Argument(_))
        ));
    }

    #[test]
    fn ids_come_from_number_or_property() {
        let s = tagged("aspirin", Some("CHEMBL25"));
        assert_eq!(structure_id(&s, 0, None).unwrap(), "0");
        assert_eq!(structure_id(&s, 6, None).unwrap(), "6");
        assert_eq!(structure_id(&s, 0, Some("ID")).unwrap(), "CHEMBL25");
        assert!(structure_id(&tagged("x", None), 0, Some("ID")).is_err());
    }

    #[test]
    fn placeholder_is_substituted() {
        assert_eq!(
            output_path("render/mol_%s.json", "12"),
            PathBuf::from("render/mol_12.json")
        );
        assert_eq!(output_path("single.json", "1"), PathBuf::from("single.json"));
    }

    #[test]
    fn ids_cannot_escape_the_output_directory() {
        assert_eq!(
            output_path("render/mol_%s.json", "../../etc/passwd"),
            PathBuf::from("render/mol_______etc_passwd.json")
        );
        assert_eq!(
            output_path("render/%s.json", "a\\b"),
            PathBuf::from("render/a_b.json")
        );
        assert_eq!(output_path("render/%s.json", ".."), PathBuf::from("render/__.json"));
        assert_eq!(
            output_path("render/%s.json", "CHEMBL25.v2"),
            PathBuf::from("render/CHEMBL25.v2.json")
        );
    }

    #[test]
    fn comments_resolve_per_structure() {
        let s = tagged("caffeine", Some("C8"));
        assert_eq!(CommentSource::Fixed.resolve(&s, "batch"), "batch");
        assert_eq!(CommentSource::Name.resolve(&s, "batch"), "caffeine");
        assert_eq!(CommentSource::Field("ID".into()).resolve(&s, ""), "C8");
        assert_eq!(CommentSource::Field("MW".into()).resolve(&s, ""), "");
    }
}
