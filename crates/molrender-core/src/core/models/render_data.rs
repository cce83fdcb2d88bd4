use super::atom::AtomDesc;
use super::bond::{BondDescr, BondEnd};
use super::ids::{AtomIndex, BondEndIndex, BondIndex};
use super::items::{
    AttachmentPointItem, BracketItem, GraphItem, RSiteAttachmentIndexItem, RenderItemRef, TextItem,
};
use super::ring::Ring;
use super::sgroup::SGroup;
use serde::Serialize;

/// Everything a drawing backend needs to depict one structure.
///
/// Descriptors live in flat arrays indexed by position; atoms, bonds and S-groups refer
/// to the items they own through ranges. [`MoleculeRenderData::clear`] empties every
/// array while keeping its capacity, so one instance can serve many structures.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MoleculeRenderData {
    pub atoms: Vec<AtomDesc>,
    pub bonds: Vec<BondDescr>,
    pub bond_ends: Vec<BondEnd>,
    pub graph_items: Vec<GraphItem>,
    pub rings: Vec<Ring>,
    pub text_items: Vec<TextItem>,
    pub attachment_points: Vec<AttachmentPointItem>,
    pub rsite_attachment_indices: Vec<RSiteAttachmentIndexItem>,
    pub brackets: Vec<BracketItem>,
    /// Text items holding atom-to-atom mapping numbers.
    pub aam: Vec<usize>,
    /// Text items holding reacting-center marks.
    pub reacting_centers: Vec<usize>,
    /// Text items holding inversion marks.
    pub inversions: Vec<usize>,
    /// Text items holding exact-change marks.
    pub exact_changes: Vec<usize>,
    pub sgroups: Vec<SGroup>,
}

impl MoleculeRenderData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.atoms.clear();
        self.bonds.clear();
        self.bond_ends.clear();
        self.graph_items.clear();
        self.rings.clear();
        self.text_items.clear();
        self.attachment_points.clear();
        self.rsite_attachment_indices.clear();
        self.brackets.clear();
        self.aam.clear();
        self.reacting_centers.clear();
        self.inversions.clear();
        self.exact_changes.clear();
        self.sgroups.clear();
    }

    pub fn add_atom(&mut self, atom: AtomDesc) -> AtomIndex {
        self.atoms.push(atom);
        self.atoms.len() - 1
    }

    /// Adds a bond between two existing atoms together with its two bond ends.
    ///
    /// # Panics
    ///
    /// Panics if either atom index is out of range.
    pub fn add_bond(&mut self, beg: AtomIndex, end: AtomIndex) -> BondIndex {
        let index = self.bonds.len();
        let p_beg = self.atoms[beg].pos;
        let p_end = self.atoms[end].pos;
        let be1 = self.bond_ends.len();
        let be2 = be1 + 1;
        self.bond_ends
            .push(BondEnd::new(index, beg, end, p_beg, p_end));
        self.bond_ends
            .push(BondEnd::new(index, end, beg, p_end, p_beg));
        self.bonds
            .push(BondDescr::new(index, beg, end, be1, be2, p_beg, p_end));
        self.atoms[beg].degree += 1;
        self.atoms[end].degree += 1;
        index
    }

    /// The bond end on the other side of the same bond.
    pub fn opposite(&self, be: BondEndIndex) -> BondEndIndex {
        let bond = &self.bonds[self.bond_ends[be].bond];
        if bond.be1 == be { bond.be2 } else { bond.be1 }
    }

    /// Bond ends anchored at `atom`, in ascending polar angle once linked.
    pub fn bond_ends_around(&self, atom: AtomIndex) -> BondEndsAround<'_> {
        let start = self.atoms[atom].first_bond_end;
        BondEndsAround {
            data: self,
            start,
            current: start,
            remaining: self.atoms[atom].degree,
        }
    }

    pub fn push_text(&mut self, item: TextItem) -> usize {
        self.text_items.push(item);
        self.text_items.len() - 1
    }

    pub fn push_atom_text(&mut self, atom: AtomIndex, item: TextItem) -> usize {
        let index = self.push_text(item);
        self.atoms[atom].text_items.push(index);
        index
    }

    pub fn push_atom_graph(&mut self, atom: AtomIndex, item: GraphItem) -> usize {
        self.graph_items.push(item);
        let index = self.graph_items.len() - 1;
        self.atoms[atom].graph_items.push(index);
        index
    }

    pub fn push_attachment_point(&mut self, atom: AtomIndex, item: AttachmentPointItem) -> usize {
        self.attachment_points.push(item);
        let index = self.attachment_points.len() - 1;
        self.atoms[atom].attachment_points.push(index);
        index
    }

    pub fn push_rsite_attachment_index(
        &mut self,
        atom: AtomIndex,
        item: RSiteAttachmentIndexItem,
    ) -> usize {
        self.rsite_attachment_indices.push(item);
        let index = self.rsite_attachment_indices.len() - 1;
        self.atoms[atom].rsite_attachment_indices.push(index);
        index
    }

    pub fn push_sgroup_text(&mut self, sgroup: usize, item: TextItem) -> usize {
        let index = self.push_text(item);
        self.sgroups[sgroup].text_items.push(index);
        index
    }

    pub fn push_sgroup_graph(&mut self, sgroup: usize, item: GraphItem) -> usize {
        self.graph_items.push(item);
        let index = self.graph_items.len() - 1;
        self.sgroups[sgroup].graph_items.push(index);
        index
    }

    pub fn push_bracket(&mut self, sgroup: usize, item: BracketItem) -> usize {
        self.brackets.push(item);
        let index = self.brackets.len() - 1;
        self.sgroups[sgroup].brackets.push(index);
        index
    }

    pub fn atom_text_items(&self, atom: AtomIndex) -> &[TextItem] {
        self.atoms[atom].text_items.slice(&self.text_items)
    }

    pub fn atom_graph_items(&self, atom: AtomIndex) -> &[GraphItem] {
        self.atoms[atom].graph_items.slice(&self.graph_items)
    }

    /// Every annotation in drawing order: text, glyphs, attachment markers, brackets.
    pub fn items(&self) -> impl Iterator<Item = RenderItemRef<'_>> {
        self.text_items
            .iter()
            .map(RenderItemRef::Text)
            .chain(self.graph_items.iter().map(RenderItemRef::Graph))
            .chain(
                self.attachment_points
                    .iter()
                    .map(RenderItemRef::AttachmentPoint),
            )
            .chain(
                self.rsite_attachment_indices
                    .iter()
                    .map(RenderItemRef::RSiteAttachmentIndex),
            )
            .chain(self.brackets.iter().map(RenderItemRef::Bracket))
    }
}

/// Walks the circular `next` list of bond ends around one atom.
pub struct BondEndsAround<'a> {
    data: &'a MoleculeRenderData,
    start: Option<BondEndIndex>,
    current: Option<BondEndIndex>,
    remaining: usize,
}

impl Iterator for BondEndsAround<'_> {
    type Item = BondEndIndex;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.current?;
        self.remaining -= 1;
        self.current = self.data.bond_ends[current]
            .next
            .filter(|&n| Some(n) != self.start);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}
