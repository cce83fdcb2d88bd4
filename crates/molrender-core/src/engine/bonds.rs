//! Drawing geometry of bonds: label clearance, stroke widths, dash styles, and the
//! placement of the second line of double and dashed bonds.

use super::context::RenderContext;
use crate::core::models::atom::AtomDesc;
use crate::core::models::bond::{
    BondDescr, BondOrder, BondTopology, NeighborAngle, QueryBondType, ReactingCenter,
    StereoDirection,
};
use crate::core::models::ids::{BondEndIndex, BondIndex};
use crate::core::models::items::{ColorClass, ItemRole, TextItem};
use crate::core::models::render_data::MoleculeRenderData;
use crate::core::settings::{DashStyle, FontSize, RenderSettings};
use crate::core::utils::geometry::BoundingBox;
use crate::core::utils::trig::ctg2c;
use nalgebra::{Point2, Vector2};
use std::f32::consts::PI;
use tracing::trace;

pub(crate) fn layout_bonds(ctx: &RenderContext, data: &mut MoleculeRenderData) {
    for index in 0..data.bonds.len() {
        clear_labels(ctx.settings, data, index);
        apply_stroke(ctx, data, index);
        mark_prolonged_ends(ctx.settings, data, index);

        let bond = &data.bonds[index];
        match (bond.order, bond.query_type) {
            (BondOrder::Triple, None) => center(data, index),
            (BondOrder::Double, None) => {
                if should_center_double(ctx, data, index) {
                    center(data, index);
                } else {
                    offset_second_line(ctx.settings, data, index);
                }
            }
            (BondOrder::Aromatic, None) if !bond.arom_ring => {
                data.bonds[index].second_line_dash = Some(DashStyle::Aromatic);
                offset_second_line(ctx.settings, data, index);
            }
            (_, Some(QueryBondType::Any)) => {
                data.bonds[index].line_dash = Some(DashStyle::Any);
            }
            (_, Some(query)) => {
                data.bonds[index].second_line_dash = Some(match query {
                    QueryBondType::SingleOrAromatic => DashStyle::SingleOrAromatic,
                    QueryBondType::DoubleOrAromatic => DashStyle::DoubleOrAromatic,
                    _ => DashStyle::Any,
                });
                offset_second_line(ctx.settings, data, index);
            }
            _ => {}
        }
    }
    annotate_bonds(ctx, data);
}

/// Distance from the atom center along `dir` to the edge of its label box.
fn label_clearance(settings: &RenderSettings, atom: &AtomDesc, dir: &Vector2<f32>) -> f32 {
    if !atom.show_label || atom.bbox_max == atom.bbox_min {
        return 0.0;
    }
    let bbox = BoundingBox {
        min: atom.pos + atom.bbox_min,
        max: atom.pos + atom.bbox_max,
    }
    .expanded(settings.label_internal_offset);
    bbox.exit_distance(&atom.pos, dir).unwrap_or(0.0)
}

/// Scales two end trims down so that at least `min_length` of `length` stays visible.
fn fit_trims(a: f32, b: f32, length: f32, min_length: f32) -> (f32, f32) {
    let available = (length - min_length).max(0.0);
    let total = a + b;
    if total <= available || total <= 0.0 {
        (a, b)
    } else {
        let k = available / total;
        (a * k, b * k)
    }
}

fn clear_labels(settings: &RenderSettings, data: &mut MoleculeRenderData, index: BondIndex) {
    let bond = &data.bonds[index];
    let (be1, be2) = (bond.be1, bond.be2);
    let at_beg = label_clearance(settings, &data.atoms[bond.beg], &data.bond_ends[be1].dir);
    let at_end = label_clearance(settings, &data.atoms[bond.end], &data.bond_ends[be2].dir);
    let (at_beg, at_end) = fit_trims(at_beg, at_end, bond.length, settings.min_bond_length);
    if at_beg > 0.0 || at_end > 0.0 {
        trace!(bond = index, at_beg, at_end, "Shortening bond at labels.");
    }

    data.bond_ends[be1].offset = at_beg;
    data.bond_ends[be2].offset = at_end;
}

fn apply_stroke(ctx: &RenderContext, data: &mut MoleculeRenderData, index: BondIndex) {
    let settings = ctx.settings;
    let bond = &mut data.bonds[index];
    if bond.highlighted && ctx.options.highlight_thickness {
        bond.thickness = 2.0 * settings.bond_line_width;
    }
    let half = if bond.thickness > 0.0 {
        bond.thickness / 2.0
    } else {
        settings.bond_line_width / 2.0
    };
    let (w1, w2) = match bond.stereodir {
        StereoDirection::Up | StereoDirection::Down => (half, settings.bond_space),
        StereoDirection::Either => (settings.bond_space / 2.0, settings.bond_space / 2.0),
        StereoDirection::None => (half, half),
    };
    let (be1, be2) = (bond.be1, bond.be2);
    data.bond_ends[be1].width = w1;
    data.bond_ends[be2].width = w2;
}

/// Flags ends at unlabelled atoms whose neighbor continues almost straight on, so the
/// backend joins the two strokes.
fn mark_prolonged_ends(settings: &RenderSettings, data: &mut MoleculeRenderData, index: BondIndex) {
    let bond = &data.bonds[index];
    for (atom, be) in [(bond.beg, bond.be1), (bond.end, bond.be2)] {
        if data.atoms[atom].show_label {
            continue;
        }
        let end = &data.bond_ends[be];
        let straight = |n: Option<NeighborAngle>| {
            n.is_some_and(|n| n.sin.abs() < settings.prolong_adj_sin_threshold && n.cos < 0.0)
        };
        if straight(end.left) || straight(end.right) {
            data.bond_ends[be].prolong = true;
        }
    }
}

fn center(data: &mut MoleculeRenderData, index: BondIndex) {
    let bond = &mut data.bonds[index];
    bond.centered = true;
    bond.double_side = 0;
    bond.second_line = None;
    let (be1, be2) = (bond.be1, bond.be2);
    data.bond_ends[be1].centered = true;
    data.bond_ends[be2].centered = true;
}

/// An end is symmetric when nothing or exactly two bonds, one on each side, leave it.
fn is_symmetric_end(data: &MoleculeRenderData, atom: usize, be: BondEndIndex) -> bool {
    let end = &data.bond_ends[be];
    match data.atoms[atom].degree {
        1 => true,
        3 => end.lang() < PI && end.rang() < PI,
        _ => false,
    }
}

fn touches_stereo_bond(data: &MoleculeRenderData, bond: &BondDescr) -> bool {
    [bond.beg, bond.end].into_iter().any(|atom| {
        data.bond_ends_around(atom).any(|be| {
            let other = data.bond_ends[be].bond;
            other != bond.index && data.bonds[other].stereodir != StereoDirection::None
        })
    })
}

fn should_center_double(ctx: &RenderContext, data: &MoleculeRenderData, index: BondIndex) -> bool {
    let bond = &data.bonds[index];
    if bond.cistrans {
        return true;
    }
    if ctx.options.center_double_bond_when_stereo_adjacent && touches_stereo_bond(data, bond) {
        return true;
    }
    if bond.in_ring {
        return false;
    }
    let (beg, end) = (&data.atoms[bond.beg], &data.atoms[bond.end]);
    if beg.show_label && end.show_label {
        return true;
    }
    (beg.degree == 1 && is_symmetric_end(data, bond.end, bond.be2))
        || (end.degree == 1 && is_symmetric_end(data, bond.beg, bond.be1))
}

/// Side of the second line: `1` to the left of the begin-to-end direction, `-1` right.
fn choose_side(data: &MoleculeRenderData, bond: &BondDescr) -> i8 {
    if bond.in_ring {
        let left = data.bond_ends[bond.be1].l_ring.map(|r| &data.rings[r]);
        let right = data.bond_ends[bond.be2].l_ring.map(|r| &data.rings[r]);
        return match (left, right) {
            (Some(l), Some(r)) => {
                let prefer_right = r.dbl_bond_count > l.dbl_bond_count
                    || (r.dbl_bond_count == l.dbl_bond_count && r.len() < l.len());
                if prefer_right { -1 } else { 1 }
            }
            (None, Some(_)) => -1,
            _ => 1,
        };
    }

    let mut balance = 0i32;
    for (atom, own) in [(bond.beg, bond.be1), (bond.end, bond.be2)] {
        for be in data.bond_ends_around(atom).filter(|&be| be != own) {
            let d = data.bond_ends[be].dir;
            let cross = bond.dir.x * d.y - bond.dir.y * d.x;
            if cross > 0.0 {
                balance += 1;
            } else if cross < 0.0 {
                balance -= 1;
            }
        }
    }
    if balance < 0 { -1 } else { 1 }
}

/// Trim of the second line at one end so that it stops on the bisector of the angle
/// to the neighboring bond on the same side.
fn angle_trim(neighbor: Option<NeighborAngle>, bond_space: f32, max_trim: f32) -> f32 {
    match neighbor {
        None => 0.0,
        Some(n) if n.angle >= PI => 0.0,
        // Collinear neighbors: the bisector runs along the bond itself.
        Some(n) => ctg2c(n.cos).map_or(max_trim, |c| (bond_space * c).min(max_trim)),
    }
}

fn offset_second_line(settings: &RenderSettings, data: &mut MoleculeRenderData, index: BondIndex) {
    let bond = &data.bonds[index];
    let side = choose_side(data, bond);
    let (end1, end2) = (&data.bond_ends[bond.be1], &data.bond_ends[bond.be2]);
    let (beg_neighbor, end_neighbor) = if side > 0 {
        (end1.left, end2.right)
    } else {
        (end1.right, end2.left)
    };
    let max_trim = (bond.length - settings.min_bond_length).max(0.0) / 2.0;

    let trim_at = |atom: usize, label_trim: f32, neighbor| {
        if data.atoms[atom].show_label {
            label_trim
        } else {
            angle_trim(neighbor, settings.bond_space, max_trim)
        }
    };
    let trim_beg = trim_at(bond.beg, end1.offset, beg_neighbor);
    let trim_end = trim_at(bond.end, end2.offset, end_neighbor);
    let (trim_beg, trim_end) =
        fit_trims(trim_beg, trim_end, bond.length, settings.min_bond_length);

    let shift: Vector2<f32> = bond.norm * (f32::from(side) * settings.bond_space);
    let p_beg: Point2<f32> = data.atoms[bond.beg].pos + bond.dir * trim_beg + shift;
    let p_end: Point2<f32> = data.atoms[bond.end].pos - bond.dir * trim_end + shift;

    let bond = &mut data.bonds[index];
    bond.double_side = side;
    bond.second_line = Some([p_beg, p_end]);
}

fn reacting_center_mark(rc: ReactingCenter) -> Option<&'static str> {
    match rc {
        ReactingCenter::Unmarked => None,
        ReactingCenter::NotCenter => Some("x"),
        ReactingCenter::Center => Some("*"),
        ReactingCenter::Unchanged => Some("="),
        ReactingCenter::MadeOrBroken => Some("#"),
        ReactingCenter::OrderChanged => Some("~"),
        ReactingCenter::MadeOrBrokenAndOrderChanged => Some("#~"),
    }
}

fn bond_text(
    ctx: &RenderContext,
    anchor: &Point2<f32>,
    role: ItemRole,
    text: String,
    font: FontSize,
    normal: Vector2<f32>,
    distance: f32,
) -> TextItem {
    let size = ctx.metrics.text_extent(&text, ctx.settings.font_size(font));
    let mut item = TextItem::new(role, text, font);
    item.base.bbsz = size;
    item.base.relpos = normal * (distance + size.y / 2.0);
    item.base.no_bond_offset = true;
    item.base.color = ColorClass::Base;
    item.base.center_on(anchor);
    item
}

/// Bond ids, topology marks and reacting-center marks.
fn annotate_bonds(ctx: &RenderContext, data: &mut MoleculeRenderData) {
    let space = ctx.settings.bond_space;
    for index in 0..data.bonds.len() {
        let (center, norm) = (data.bonds[index].center, data.bonds[index].norm);

        if ctx.options.show_bond_ids {
            let item = bond_text(
                ctx,
                &center,
                ItemRole::BondId,
                index.to_string(),
                FontSize::Indices,
                norm,
                space,
            );
            data.bonds[index].ti_id = Some(data.push_text(item));
        }

        let topology = match data.bonds[index].topology {
            BondTopology::Ring => Some("rng"),
            BondTopology::Chain => Some("chn"),
            BondTopology::Either => None,
        };
        if let Some(mark) = topology {
            let item = bond_text(
                ctx,
                &center,
                ItemRole::Topology,
                mark.to_string(),
                FontSize::Attr,
                -norm,
                space,
            );
            data.bonds[index].ti_topology = Some(data.push_text(item));
        }

        if let Some(mark) = reacting_center_mark(data.bonds[index].reacting_center) {
            let item = bond_text(
                ctx,
                &center,
                ItemRole::ReactingCenter,
                mark.to_string(),
                FontSize::Attr,
                norm,
                0.0,
            );
            let text = data.push_text(item);
            data.reacting_centers.push(text);
        }
    }
}
