//! Reading laid-out structures and writing populated render models.
//!
//! Structure files come in two encodings behind one [`traits::StructureFile`]
//! interface; [`format::StructureFormat`] picks one from a file extension. Render
//! output is a JSON dump of the populated model ([`dump`]).

pub mod dump;
pub mod error;
pub mod format;
pub mod json_file;
pub mod toml_file;
pub mod traits;
