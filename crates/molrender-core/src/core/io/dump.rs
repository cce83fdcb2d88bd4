use super::error::StructureFileError;
use crate::core::canvas::CanvasOptions;
use crate::core::models::render_data::MoleculeRenderData;
use crate::core::settings::RenderSettings;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// A populated render model together with the constants and page layout it is drawn
/// with.
#[derive(Debug, Serialize)]
pub struct RenderDump<'a> {
    pub name: &'a str,
    pub title: &'a str,
    pub comment: &'a str,
    /// `(row, column)` of the structure on a grid page.
    pub grid_cell: (usize, usize),
    pub settings: &'a RenderSettings,
    pub canvas: &'a CanvasOptions,
    pub molecule: &'a MoleculeRenderData,
}

impl RenderDump<'_> {
    pub fn write_to(&self, writer: &mut impl Write) -> Result<(), StructureFileError> {
        serde_json::to_writer_pretty(&mut *writer, self)?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), StructureFileError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
