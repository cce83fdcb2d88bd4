use super::context::RenderContext;
use crate::core::models::items::{BracketItem, ColorClass, ItemRole, TextItem};
use crate::core::models::render_data::MoleculeRenderData;
use crate::core::models::sgroup::{SGroup, SGroupKind};
use crate::core::models::structure::Structure;
use crate::core::settings::FontSize;
use crate::core::utils::geometry::BoundingBox;
use nalgebra::{Point2, Vector2};
use tracing::trace;

/// Registers every S-group and draws the bracket pair and subscript of bracketed kinds.
pub(crate) fn place_sgroups(
    structure: &Structure,
    ctx: &RenderContext,
    data: &mut MoleculeRenderData,
) {
    for source in &structure.sgroups {
        let mut group = SGroup::new(source.kind, source.atoms.clone());
        group.subscript = source
            .subscript
            .clone()
            .or_else(|| (source.kind == SGroupKind::Sru).then(|| "n".to_string()));
        data.sgroups.push(group);
        let index = data.sgroups.len() - 1;

        if source.kind.is_bracketed() {
            place_brackets(ctx, data, index);
        }
    }
}

/// Bounding box of the member atoms and their visible labels.
fn member_bounds(data: &MoleculeRenderData, sgroup: usize) -> Option<BoundingBox> {
    let corners: Vec<Point2<f32>> = data.sgroups[sgroup]
        .atoms
        .iter()
        .map(|&atom| &data.atoms[atom])
        .flat_map(|atom| [atom.pos, atom.pos + atom.bbox_min, atom.pos + atom.bbox_max])
        .collect();
    BoundingBox::enclosing(&corners)
}

fn place_brackets(ctx: &RenderContext, data: &mut MoleculeRenderData, sgroup: usize) {
    let space = ctx.settings.bond_space;
    let Some(bounds) = member_bounds(data, sgroup) else {
        trace!(sgroup, "Skipping brackets of an empty S-group.");
        return;
    };
    let bounds = bounds.expanded(space);
    let up = Vector2::new(0.0, 1.0);
    let height = bounds.height();

    let left = BracketItem::new(bounds.min, up, Vector2::new(1.0, 0.0), height, space);
    let right_foot = Point2::new(bounds.max.x, bounds.min.y);
    let right = BracketItem::new(right_foot, up, Vector2::new(-1.0, 0.0), height, space);
    data.push_bracket(sgroup, left);
    data.push_bracket(sgroup, right);

    if let Some(text) = data.sgroups[sgroup].subscript.clone() {
        let size = ctx
            .metrics
            .text_extent(&text, ctx.settings.font_size(FontSize::Indices));
        let mut item = TextItem::new(ItemRole::SGroupIndex, text, FontSize::Indices);
        item.base.bbsz = size;
        item.base.relpos = Vector2::new(space + size.x / 2.0, -size.y / 2.0);
        item.base.color = ColorClass::Base;
        item.base.center_on(&right_foot);
        data.push_sgroup_text(sgroup, item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::AtomDesc;
    use crate::core::models::structure::StructureSGroup;
    use crate::core::settings::RenderSettings;
    use crate::engine::config::RenderOptionsBuilder;
    use crate::engine::metrics::MonospaceMetrics;

    fn run(kind: SGroupKind, subscript: Option<&str>) -> MoleculeRenderData {
        let options = RenderOptionsBuilder::new().bond_length(30.0).build().unwrap();
        let settings = RenderSettings::new(options.scale_factor());
        let metrics = MonospaceMetrics::default();
        let ctx = RenderContext::new(&settings, &options, &metrics);

        let mut structure = Structure::new("polymer");
        structure.sgroups.push(StructureSGroup {
            kind,
            atoms: vec![0, 1],
            subscript: subscript.map(str::to_string),
        });
        let mut data = MoleculeRenderData::new();
        data.add_atom(AtomDesc::new(Point2::new(0.0, 0.0), "C"));
        data.add_atom(AtomDesc::new(Point2::new(30.0, 10.0), "C"));
        place_sgroups(&structure, &ctx, &mut data);
        data
    }

    #[test]
    fn repeat_unit_gets_enclosing_brackets_and_default_subscript() {
        let data = run(SGroupKind::Sru, None);
        let group = &data.sgroups[0];
        assert_eq!(group.brackets.count, 2);
        let brackets = group.brackets.slice(&data.brackets);
        let (left, right) = (&brackets[0], &brackets[1]);
        assert!(left.p0.x < 0.0 && right.p0.x > 30.0);
        assert!(left.p0.y < 0.0 && left.p1.y > 10.0);
        assert!(left.q0.x > left.p0.x);
        assert!(right.q0.x < right.p0.x);
        assert!((left.length - right.length).abs() < 1e-5);

        let texts = group.text_items.slice(&data.text_items);
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].text, "n");
        assert!(texts[0].base.bbp.x > right.p0.x);
    }

    #[test]
    fn explicit_subscript_overrides_default() {
        let data = run(SGroupKind::Multiple, Some("3"));
        let texts = data.sgroups[0].text_items.slice(&data.text_items);
        assert_eq!(texts[0].text, "3");
    }

    #[test]
    fn superatoms_are_registered_without_brackets() {
        let data = run(SGroupKind::Superatom, None);
        assert_eq!(data.sgroups.len(), 1);
        assert!(data.sgroups[0].brackets.is_empty());
        assert!(data.brackets.is_empty());
        assert!(data.text_items.is_empty());
    }
}
