use super::context::RenderContext;
use super::error::EngineError;
use crate::core::models::atom::{AtomDesc, AtomKind};
use crate::core::models::items::ColorClass;
use crate::core::models::render_data::MoleculeRenderData;
use crate::core::models::structure::Structure;
use tracing::trace;

/// Input bonds shorter than this, in input units, are treated as coincident atoms.
const MIN_INPUT_BOND_LENGTH: f32 = 1e-4;

/// Factor mapping input coordinates to pixels so that the mean bond is
/// `bond_length` pixels long. Structures without bonds are taken to be in
/// bond-length units already.
pub(crate) fn coordinate_scale(structure: &Structure, bond_length: f32) -> f32 {
    match structure.mean_bond_length() {
        Some(mean) if mean >= MIN_INPUT_BOND_LENGTH => bond_length / mean,
        _ => bond_length,
    }
}

/// Fills `data` with one descriptor per atom and bond of `structure`, in input order.
pub(crate) fn load_structure(
    structure: &Structure,
    ctx: &RenderContext,
    data: &mut MoleculeRenderData,
) -> Result<(), EngineError> {
    structure.validate()?;
    let scale = coordinate_scale(structure, ctx.options.bond_length);
    trace!(scale, "Scaling input coordinates.");

    data.atoms.reserve(structure.atoms.len());
    for atom in &structure.atoms {
        let mut desc = AtomDesc::new(atom.position() * scale, atom.label.as_str());
        desc.kind = atom.kind;
        desc.highlighted = atom.highlighted;
        desc.aam = atom.aam;
        desc.inversion = atom.inversion;
        desc.exact_change = atom.exact_change;
        desc.stereo_group = atom.stereo_group;
        desc.pseudo_verbose = atom.kind == AtomKind::Pseudo;
        desc.is_rgroup_attachment_point = !atom.attachment_points.is_empty();
        desc.atom_list.extend(atom.atom_list.iter().cloned());
        desc.color = if ctx.options.atom_coloring && atom.kind == AtomKind::Regular {
            ColorClass::for_element(&atom.label)
        } else {
            ColorClass::Base
        };
        data.add_atom(desc);
    }

    data.bonds.reserve(structure.bonds.len());
    data.bond_ends.reserve(2 * structure.bonds.len());
    for (i, bond) in structure.bonds.iter().enumerate() {
        let p = data.atoms[bond.begin].pos;
        let q = data.atoms[bond.end].pos;
        if (q - p).norm() < MIN_INPUT_BOND_LENGTH * scale {
            return Err(EngineError::DegenerateGeometry {
                location: format!("bond {i} ({}-{})", bond.begin, bond.end),
                reason: "bond endpoints coincide",
            });
        }
        let index = data.add_bond(bond.begin, bond.end);
        let descr = &mut data.bonds[index];
        descr.order = bond.order;
        descr.query_type = bond.query;
        descr.stereodir = bond.stereo;
        descr.cistrans = bond.cistrans;
        descr.topology = bond.topology;
        descr.reacting_center = bond.reacting_center;
        descr.stereo_care = bond.stereo_care;
        descr.highlighted = bond.highlighted;
    }
    Ok(())
}
