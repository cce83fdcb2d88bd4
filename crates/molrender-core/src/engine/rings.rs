//! Ring perception on the planar embedding.
//!
//! Every bond end bounds exactly one face: the one on its left. Walking a face means
//! stepping to the far atom and turning onto the clockwise neighbor of the returning
//! bond end. Faces traced counter-clockwise with a positive area are rings; the outer
//! face of each component runs clockwise and is dropped.

use super::context::RenderScratch;
use crate::core::models::bond::BondOrder;
use crate::core::models::ids::BondEndIndex;
use crate::core::models::render_data::MoleculeRenderData;
use crate::core::models::ring::Ring;
use crate::core::utils::geometry::signed_area;
use tracing::debug;

pub(crate) fn perceive_rings(
    data: &mut MoleculeRenderData,
    scratch: &mut RenderScratch,
    min_area: f32,
) {
    let n = data.bond_ends.len();
    scratch.visited.clear();
    scratch.visited.resize(n, false);

    for start in 0..n {
        if scratch.visited[start] {
            continue;
        }
        if !trace_face(data, scratch, start) {
            debug!(start, "Face walk did not close; skipping.");
            continue;
        }
        if has_pendant_edge(data, &scratch.face) {
            debug!(
                size = scratch.face.len(),
                "Skipping face with pendant or bridging bonds."
            );
            continue;
        }
        if signed_area(&scratch.vertices) <= min_area {
            continue;
        }
        add_ring(data, scratch);
    }
    debug!(rings = data.rings.len(), "Ring perception complete.");
}

/// Walks the face left of `start`, filling the face buffers of `scratch`.
///
/// Returns `false` if the walk runs into an already visited bond end before closing.
fn trace_face(data: &MoleculeRenderData, scratch: &mut RenderScratch, start: BondEndIndex) -> bool {
    scratch.face.clear();
    scratch.face_angles.clear();
    scratch.vertices.clear();

    let mut current = start;
    loop {
        scratch.visited[current] = true;
        scratch.face.push(current);
        scratch.vertices.push(data.bond_ends[current].p);

        let twin = &data.bond_ends[data.opposite(current)];
        scratch.face_angles.push(twin.rang());
        current = twin.rnei().unwrap_or_else(|| data.opposite(current));

        if current == start {
            return true;
        }
        if scratch.visited[current] || scratch.face.len() > data.bond_ends.len() {
            return false;
        }
    }
}

fn has_pendant_edge(data: &MoleculeRenderData, face: &[BondEndIndex]) -> bool {
    face.iter().any(|&be| face.contains(&data.opposite(be)))
}

fn add_ring(data: &mut MoleculeRenderData, scratch: &RenderScratch) {
    let ring_index = data.rings.len();
    let mut ring = Ring::new();
    for (&be, &angle) in scratch.face.iter().zip(&scratch.face_angles) {
        ring.push_edge(be, angle);
        data.bond_ends[be].l_ring = Some(ring_index);

        let bond = &mut data.bonds[data.bond_ends[be].bond];
        bond.in_ring = true;
        if bond.is_double_like() {
            ring.dbl_bond_count += 1;
        }
        if bond.order != BondOrder::Aromatic {
            ring.revoke_aromatic();
        }
    }
    ring.derive_geometry(&scratch.vertices);

    if ring.aromatic() {
        for &be in ring.bond_ends() {
            let bond = data.bond_ends[be].bond;
            data.bonds[bond].arom_ring = true;
        }
    }
    data.rings.push(ring);
}
