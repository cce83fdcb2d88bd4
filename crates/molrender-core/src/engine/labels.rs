//! Atom annotation: label visibility, implicit hydrogens and the items drawn around a
//! label.
//!
//! Items of one atom are appended back to back so the atom can own them through a
//! single range. The label group grows outward from the element symbol; its final
//! extent becomes the atom's label box, which the bond pass uses to shorten bonds.

use super::config::{HydroMode, LabelMode, StereoStyle};
use super::context::RenderContext;
use crate::core::models::atom::{AtomKind, HydroPosition, Inversion};
use crate::core::models::ids::AtomIndex;
use crate::core::models::items::{
    AttachmentPointItem, ColorClass, GraphItem, GraphKind, ItemRole, RSiteAttachmentIndexItem,
    TextItem,
};
use crate::core::models::render_data::MoleculeRenderData;
use crate::core::models::structure::{Radical, Structure, StructureAtom};
use crate::core::settings::FontSize;
use crate::core::utils::elements;
use crate::core::utils::geometry::rotate;
use nalgebra::{Point2, Vector2};
use std::f32::consts::{FRAC_PI_4, PI};
use tracing::trace;

/// Length of an attachment point stub, in bond lengths.
const ATTACHMENT_STUB_RATIO: f32 = 0.4;
/// Distance of an R-site attachment index from its atom, in bond lengths.
const RSITE_INDEX_DISTANCE_RATIO: f32 = 0.3;

/// Extent of a label group relative to the atom position, y up.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct LabelBox {
    left: f32,
    right: f32,
    bottom: f32,
    top: f32,
}

impl LabelBox {
    fn around(size: Vector2<f32>) -> Self {
        Self {
            left: -size.x / 2.0,
            right: size.x / 2.0,
            bottom: -size.y / 2.0,
            top: size.y / 2.0,
        }
    }

    fn include(&mut self, center: Vector2<f32>, size: Vector2<f32>) {
        self.left = self.left.min(center.x - size.x / 2.0);
        self.right = self.right.max(center.x + size.x / 2.0);
        self.bottom = self.bottom.min(center.y - size.y / 2.0);
        self.top = self.top.max(center.y + size.y / 2.0);
    }
}

pub(crate) fn annotate_atoms(
    structure: &Structure,
    ctx: &RenderContext,
    data: &mut MoleculeRenderData,
) {
    for (index, source) in structure.atoms.iter().enumerate() {
        resolve_visibility(source, ctx, data, index);
        place_label_group(source, ctx, data, index);
        place_attachment_points(source, ctx, data, index);
        place_rsite_indices(source, ctx, data, index);
    }
    find_nearby_atoms(
        ctx.options.bond_length,
        ctx.settings.neighboring_atom_distance_threshold_a,
        data,
    );
}

/// Bond order sum of an atom, with aromatic bonds counting one and a half and query
/// bonds counting as single.
fn bond_order_sum(data: &MoleculeRenderData, atom: AtomIndex) -> u32 {
    let halves: u32 = data
        .bond_ends_around(atom)
        .map(|be| {
            let bond = &data.bonds[data.bond_ends[be].bond];
            if bond.query_type.is_some() {
                2
            } else {
                bond.order.valence_halves()
            }
        })
        .sum();
    halves.div_ceil(2)
}

fn implicit_hydrogens(source: &StructureAtom, data: &MoleculeRenderData, atom: AtomIndex) -> u32 {
    if let Some(count) = source.implicit_h {
        return count;
    }
    if source.kind != AtomKind::Regular {
        return 0;
    }
    let bond_orders = bond_order_sum(data, atom);
    let count =
        elements::implicit_hydrogens(&source.label, bond_orders, source.charge).unwrap_or(0);
    let unpaired = match source.radical {
        Radical::None => 0,
        Radical::Doublet => 1,
        Radical::Singlet | Radical::Triplet => 2,
    };
    count.saturating_sub(unpaired)
}

fn is_decorated(source: &StructureAtom) -> bool {
    source.charge != 0
        || source.isotope.is_some()
        || source.radical != Radical::None
        || source.aam.is_some()
}

fn label_visible(source: &StructureAtom, degree: usize, mode: LabelMode) -> bool {
    if source.kind != AtomKind::Regular || !elements::is_carbon(&source.label) {
        return true;
    }
    match mode {
        LabelMode::ForceShow => true,
        LabelMode::ForceHide => false,
        LabelMode::Normal => is_decorated(source) || degree <= 1,
        LabelMode::HideTerminal => is_decorated(source) || degree == 0,
    }
}

fn hydrogens_visible(source: &StructureAtom, degree: usize, mode: HydroMode) -> bool {
    let terminal = degree <= 1;
    let hetero = !elements::is_carbon(&source.label);
    match mode {
        HydroMode::None => false,
        HydroMode::Terminal => terminal,
        HydroMode::Hetero => hetero,
        HydroMode::TerminalHetero => terminal || hetero,
        HydroMode::All => true,
    }
}

fn resolve_visibility(
    source: &StructureAtom,
    ctx: &RenderContext,
    data: &mut MoleculeRenderData,
    index: AtomIndex,
) {
    let implicit_h = implicit_hydrogens(source, data, index);
    let atom = &mut data.atoms[index];
    atom.implicit_h = implicit_h;
    atom.show_label = label_visible(source, atom.degree, ctx.options.label_mode);
    atom.show_hydro = atom.show_label
        && implicit_h > 0
        && source.kind == AtomKind::Regular
        && hydrogens_visible(source, atom.degree, ctx.options.hydro_mode);
    if atom.show_hydro {
        atom.hydro_pos = atom.choose_hydro_position(ctx.settings.min_sin);
    }
}

fn label_text(source: &StructureAtom) -> String {
    if source.kind == AtomKind::Query && !source.atom_list.is_empty() {
        format!("[{}]", source.atom_list.join(","))
    } else {
        source.label.clone()
    }
}

fn measure(ctx: &RenderContext, text: &str, font: FontSize) -> Vector2<f32> {
    ctx.metrics.text_extent(text, ctx.settings.font_size(font))
}

/// Writes the items of one atom's label group.
struct AtomItems<'c, 'a> {
    ctx: &'c RenderContext<'a>,
    index: AtomIndex,
    anchor: Point2<f32>,
    color: ColorClass,
    highlighted: bool,
}

impl AtomItems<'_, '_> {
    fn text(
        &self,
        data: &mut MoleculeRenderData,
        role: ItemRole,
        text: String,
        font: FontSize,
        size: Vector2<f32>,
        center: Vector2<f32>,
    ) -> usize {
        let mut item = TextItem::new(role, text, font);
        item.base.bbsz = size;
        item.base.relpos = center;
        item.base.color = self.color;
        item.base.highlighted = self.highlighted;
        item.base.center_on(&self.anchor);
        data.push_atom_text(self.index, item)
    }

    fn graph(
        &self,
        data: &mut MoleculeRenderData,
        role: ItemRole,
        kind: GraphKind,
        size: Vector2<f32>,
        center: Vector2<f32>,
    ) {
        let mut item = GraphItem::new(role, kind);
        item.base.bbsz = size;
        item.base.relpos = center;
        item.base.color = self.color;
        item.base.highlighted = self.highlighted;
        item.base.no_bond_offset = true;
        item.base.center_on(&self.anchor);
        data.push_atom_graph(self.index, item);
    }
}

fn place_label_group(
    source: &StructureAtom,
    ctx: &RenderContext,
    data: &mut MoleculeRenderData,
    index: AtomIndex,
) {
    let atom = &data.atoms[index];
    let items = AtomItems {
        ctx,
        index,
        anchor: atom.pos,
        color: atom.color,
        highlighted: atom.highlighted,
    };
    let mut bx = LabelBox::default();

    if atom.show_label {
        let text = label_text(source);
        let size = measure(ctx, &text, FontSize::Label);
        items.text(data, ItemRole::Label, text, FontSize::Label, size, Vector2::zeros());
        bx = LabelBox::around(size);
        let label_height = size.y;

        if data.atoms[index].show_hydro {
            place_hydrogens(&items, data, &mut bx, label_height);
        }
        let sup_y = -ctx.settings.upper_index_shift * label_height;
        if let Some(isotope) = source.isotope {
            let text = isotope.to_string();
            let size = measure(ctx, &text, FontSize::Indices);
            let center = Vector2::new(bx.left - size.x / 2.0, sup_y);
            items.text(data, ItemRole::Isotope, text, FontSize::Indices, size, center);
            bx.include(center, size);
        }
        if source.charge != 0 {
            place_charge(&items, data, &mut bx, source.charge, sup_y);
        }
        if source.radical != Radical::None {
            place_radical(&items, data, &mut bx, source.radical);
        }

        let atom = &mut data.atoms[index];
        atom.bbox_min = Vector2::new(bx.left, bx.bottom);
        atom.bbox_max = Vector2::new(bx.right, bx.top);
    }

    let stereo_group = source
        .stereo_group
        .filter(|_| ctx.options.stereo_style == StereoStyle::Ext);
    if let Some(group) = stereo_group {
        let text = group.label();
        let size = measure(ctx, &text, FontSize::Attr);
        let offset = ctx.settings.stereo_group_label_offset;
        let center = Vector2::new(0.0, bx.top + offset + size.y / 2.0);
        items.text(data, ItemRole::StereoGroup, text, FontSize::Attr, size, center);
    }

    if let Some(aam) = source.aam {
        let text = aam.to_string();
        let size = measure(ctx, &text, FontSize::Attr);
        let center = Vector2::new(bx.left - size.x / 2.0, bx.top + size.y / 2.0);
        let item = items.text(data, ItemRole::Aam, text, FontSize::Attr, size, center);
        data.text_items[item].base.color = ColorClass::Aam;
        data.aam.push(item);
    }

    let mut below = bx.bottom;
    let inversion = match source.inversion {
        Inversion::Unmarked => None,
        Inversion::Inverts => Some("Inv"),
        Inversion::Retains => Some("Ret"),
    };
    if let Some(mark) = inversion {
        let size = measure(ctx, mark, FontSize::Attr);
        let center = Vector2::new(0.0, below - size.y / 2.0);
        let text = mark.to_string();
        let item = items.text(data, ItemRole::Inversion, text, FontSize::Attr, size, center);
        data.inversions.push(item);
        below -= size.y;
    }
    if source.exact_change {
        let size = measure(ctx, "ext", FontSize::Attr);
        let center = Vector2::new(0.0, below - size.y / 2.0);
        let text = "ext".to_string();
        let item = items.text(data, ItemRole::ExactChange, text, FontSize::Attr, size, center);
        data.exact_changes.push(item);
    }

    if ctx.options.show_atom_ids {
        let text = index.to_string();
        let size = measure(ctx, &text, FontSize::Indices);
        let center = Vector2::new(bx.right + size.x / 2.0, bx.bottom - size.y / 2.0);
        items.text(data, ItemRole::AtomId, text, FontSize::Indices, size, center);
    }
}

fn place_hydrogens(
    items: &AtomItems,
    data: &mut MoleculeRenderData,
    bx: &mut LabelBox,
    label_height: f32,
) {
    let ctx = items.ctx;
    let atom = &data.atoms[items.index];
    let (count, side) = (atom.implicit_h, atom.hydro_pos);
    let h = measure(ctx, "H", FontSize::Label);
    let index_text = (count > 1).then(|| count.to_string());
    let c = index_text
        .as_deref()
        .map_or_else(Vector2::zeros, |t| measure(ctx, t, FontSize::Indices));
    let sub_y = -ctx.settings.lower_index_shift * label_height;

    let h_center = match side {
        HydroPosition::Right => Vector2::new(bx.right + h.x / 2.0, 0.0),
        HydroPosition::Left => Vector2::new(bx.left - c.x - h.x / 2.0, 0.0),
        HydroPosition::Up => Vector2::new(0.0, bx.top + h.y / 2.0),
        HydroPosition::Down => Vector2::new(0.0, bx.bottom - h.y / 2.0),
    };
    items.text(data, ItemRole::Hydrogen, "H".to_string(), FontSize::Label, h, h_center);
    bx.include(h_center, h);

    if let Some(text) = index_text {
        let center = Vector2::new(h_center.x + h.x / 2.0 + c.x / 2.0, h_center.y + sub_y);
        items.text(data, ItemRole::HydroIndex, text, FontSize::Indices, c, center);
        bx.include(center, c);
    }
    trace!(atom = items.index, count, ?side, "Placed implicit hydrogens.");
}

fn place_charge(
    items: &AtomItems,
    data: &mut MoleculeRenderData,
    bx: &mut LabelBox,
    charge: i32,
    sup_y: f32,
) {
    let settings = items.ctx.settings;
    if charge.abs() > 1 {
        let text = charge.unsigned_abs().to_string();
        let size = measure(items.ctx, &text, FontSize::Indices);
        let center = Vector2::new(bx.right + size.x / 2.0, sup_y);
        items.text(data, ItemRole::ChargeValue, text, FontSize::Indices, size, center);
        bx.include(center, size);
    }
    let kind = if charge > 0 { GraphKind::Plus } else { GraphKind::Minus };
    let size = Vector2::repeat(settings.graph_item_digit_width);
    let center = Vector2::new(bx.right + size.x / 2.0, sup_y);
    items.graph(data, ItemRole::ChargeSign, kind, size, center);
    bx.include(center, size);
}

fn place_radical(
    items: &AtomItems,
    data: &mut MoleculeRenderData,
    bx: &mut LabelBox,
    radical: Radical,
) {
    let settings = items.ctx.settings;
    let dot = Vector2::repeat(2.0 * settings.graph_item_dot_radius);
    let cap = Vector2::new(settings.graph_item_cap_width, settings.graph_item_cap_base);
    let (kind, size, count, gap) = match radical {
        Radical::None => return,
        Radical::Doublet => (GraphKind::Dot, dot, 1, 0.0),
        Radical::Singlet => (GraphKind::Dot, dot, 2, settings.radical_top_dist_dot),
        Radical::Triplet => (GraphKind::Cap, cap, 2, settings.radical_top_dist_cap),
    };
    let y = bx.top + settings.radical_top_offset + size.y / 2.0;
    let half = (gap + size.x) / 2.0;
    let pair = [-half, half];
    let xs = if count == 1 { &[0.0][..] } else { &pair[..] };
    for &x in xs {
        let center = Vector2::new(x, y);
        items.graph(data, ItemRole::Radical, kind, size, center);
        bx.include(center, size);
    }
}

/// Direction away from the existing bonds of an atom, rotated by `k` quarter turns of
/// the free sector for the `k`-th marker.
fn free_direction(data: &MoleculeRenderData, atom: AtomIndex, k: usize) -> Vector2<f32> {
    let widest = data
        .bond_ends_around(atom)
        .max_by(|&a, &b| data.bond_ends[a].lang().total_cmp(&data.bond_ends[b].lang()));
    let base = match widest {
        Some(be) => {
            let end = &data.bond_ends[be];
            let sweep = if end.left.is_some() { end.lang() } else { 2.0 * PI };
            rotate(&end.dir, sweep / 2.0)
        }
        None => Vector2::new(0.0, 1.0),
    };
    let turn = match k {
        0 => 0.0,
        k if k % 2 == 1 => FRAC_PI_4 * k.div_ceil(2) as f32,
        k => -FRAC_PI_4 * (k / 2) as f32,
    };
    rotate(&base, turn)
}

fn place_attachment_points(
    source: &StructureAtom,
    ctx: &RenderContext,
    data: &mut MoleculeRenderData,
    index: AtomIndex,
) {
    let pos = data.atoms[index].pos;
    let stub = ctx.options.bond_length * ATTACHMENT_STUB_RATIO;
    for (k, &number) in source.attachment_points.iter().enumerate() {
        let dir = free_direction(data, index, k);
        let p1 = pos + dir * stub;
        let text = number.to_string();
        let size = measure(ctx, &text, FontSize::AttachmentPointIndex);

        let mut item = AttachmentPointItem {
            number: Some(number),
            dir,
            p0: pos,
            p1,
            ..AttachmentPointItem::default()
        };
        item.base.bbsz = size;
        item.base.relpos = dir * (stub + size.norm() / 2.0);
        item.base.center_on(&pos);
        data.push_attachment_point(index, item);
    }
}

fn place_rsite_indices(
    source: &StructureAtom,
    ctx: &RenderContext,
    data: &mut MoleculeRenderData,
    index: AtomIndex,
) {
    if source.kind != AtomKind::RSite {
        return;
    }
    let pos = data.atoms[index].pos;
    let radius = ctx.settings.font_size(FontSize::RSiteAttachmentIndex) * 0.7;
    let distance = ctx.options.bond_length * RSITE_INDEX_DISTANCE_RATIO;
    let ends: Vec<_> = data.bond_ends_around(index).collect();
    for (k, &order) in source.rsite_attachment_orders.iter().enumerate() {
        let dir = match ends.get(k) {
            Some(&be) => rotate(&data.bond_ends[be].dir, FRAC_PI_4),
            None => free_direction(data, index, k),
        };
        let mut item = RSiteAttachmentIndexItem {
            number: Some(order),
            radius,
            ..RSiteAttachmentIndexItem::default()
        };
        item.base.bbsz = Vector2::repeat(2.0 * radius);
        item.base.relpos = dir * distance;
        item.base.center_on(&pos);
        data.push_rsite_attachment_index(index, item);
    }
}

/// Records, for every atom, the non-bonded atoms closer than `threshold` bond lengths.
fn find_nearby_atoms(bond_length: f32, threshold: f32, data: &mut MoleculeRenderData) {
    let limit = bond_length * threshold;
    for i in 0..data.atoms.len() {
        for j in i + 1..data.atoms.len() {
            if (data.atoms[j].pos - data.atoms[i].pos).norm() >= limit {
                continue;
            }
            let bonded = data
                .bond_ends_around(i)
                .any(|be| data.bond_ends[be].other_atom == j);
            if !bonded {
                data.atoms[i].nearby_atoms.push(j);
                data.atoms[j].nearby_atoms.push(i);
            }
        }
    }
}
