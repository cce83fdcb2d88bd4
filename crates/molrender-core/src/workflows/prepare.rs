use crate::core::models::render_data::MoleculeRenderData;
use crate::core::models::structure::Structure;
use crate::core::settings::RenderSettings;
use crate::engine::bonds::layout_bonds;
use crate::engine::config::RenderOptions;
use crate::engine::context::{RenderContext, RenderScratch};
use crate::engine::error::EngineError;
use crate::engine::labels::annotate_atoms;
use crate::engine::linking::link_bond_ends;
use crate::engine::load::load_structure;
use crate::engine::metrics::TextMetrics;
use crate::engine::rings::perceive_rings;
use crate::engine::sgroups::place_sgroups;
use tracing::{debug, instrument};

/// Render data of one structure together with the settings it was computed for.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedStructure {
    pub settings: RenderSettings,
    pub data: MoleculeRenderData,
}

/// Runs a complete pass over `structure` with freshly allocated buffers.
#[instrument(skip_all, name = "prepare_workflow", fields(structure = %structure.name))]
pub fn run(
    structure: &Structure,
    options: &RenderOptions,
    metrics: &dyn TextMetrics,
) -> Result<PreparedStructure, EngineError> {
    let settings = RenderSettings::new(options.scale_factor());
    let mut data = MoleculeRenderData::new();
    let mut scratch = RenderScratch::new();
    let ctx = RenderContext::new(&settings, options, metrics);
    prepare_into(structure, &ctx, &mut scratch, &mut data)?;
    Ok(PreparedStructure { settings, data })
}

/// Runs a complete pass over `structure`, reusing `data` and `scratch`.
///
/// `data` is cleared first, so the result never depends on what it held before. On
/// error its contents are unspecified until the next successful call.
pub fn prepare_into(
    structure: &Structure,
    ctx: &RenderContext,
    scratch: &mut RenderScratch,
    data: &mut MoleculeRenderData,
) -> Result<(), EngineError> {
    data.clear();
    scratch.clear();

    load_structure(structure, ctx, data)?;
    link_bond_ends(data, scratch);
    perceive_rings(data, scratch, ctx.settings.eps);
    annotate_atoms(structure, ctx, data);
    layout_bonds(ctx, data);
    place_sgroups(structure, ctx, data);

    debug!(
        atoms = data.atoms.len(),
        bonds = data.bonds.len(),
        rings = data.rings.len(),
        text_items = data.text_items.len(),
        "Render data populated."
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::bond::BondOrder;
    use crate::core::models::structure::{StructureAtom, StructureBond};
    use crate::engine::config::RenderOptionsBuilder;
    use crate::engine::metrics::MonospaceMetrics;

    fn options() -> RenderOptions {
        RenderOptionsBuilder::new().bond_length(30.0).build().unwrap()
    }

    fn propene() -> Structure {
        let mut s = Structure::new("propene");
        s.atoms.push(StructureAtom::new("C", 0.0, 0.0));
        s.atoms.push(StructureAtom::new("C", 0.866, 0.5));
        s.atoms.push(StructureAtom::new("C", 1.732, 0.0));
        s.bonds.push(StructureBond::new(0, 1, BondOrder::Single));
        s.bonds.push(StructureBond::new(1, 2, BondOrder::Double));
        s
    }

    #[test]
    fn reused_buffers_give_the_same_result_as_fresh_ones() {
        let options = options();
        let metrics = MonospaceMetrics::default();
        let fresh = run(&propene(), &options, &metrics).unwrap();

        let ctx = RenderContext::new(&fresh.settings, &options, &metrics);
        let mut data = MoleculeRenderData::new();
        let mut scratch = RenderScratch::new();
        let mut other = Structure::new("water");
        other.atoms.push(StructureAtom::new("O", 0.0, 0.0));
        prepare_into(&other, &ctx, &mut scratch, &mut data).unwrap();
        prepare_into(&propene(), &ctx, &mut scratch, &mut data).unwrap();

        assert_eq!(data, fresh.data);
    }

    #[test]
    fn settings_follow_the_scale_factor() {
        let options = RenderOptionsBuilder::new()
            .bond_length(60.0)
            .relative_thickness(0.5)
            .build()
            .unwrap();
        let prepared = run(&propene(), &options, &MonospaceMetrics::default()).unwrap();
        assert_eq!(prepared.settings, RenderSettings::new(30.0));
        let bond = &prepared.data.bonds[0];
        assert!((bond.length - 60.0).abs() < 1e-3);
    }

    #[test]
    fn invalid_structure_is_reported() {
        let mut s = propene();
        s.bonds.push(StructureBond::new(0, 9, BondOrder::Single));
        let err = run(&s, &options(), &MonospaceMetrics::default()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidStructure { .. }));
    }

    #[test]
    fn coincident_atoms_are_degenerate() {
        let mut s = propene();
        s.atoms.push(StructureAtom::new("C", 0.0, 0.0));
        s.bonds.push(StructureBond::new(0, 3, BondOrder::Single));
        let err = run(&s, &options(), &MonospaceMetrics::default()).unwrap_err();
        assert!(matches!(err, EngineError::DegenerateGeometry { .. }));
    }
}
