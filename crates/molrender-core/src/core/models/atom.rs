use super::ids::{AtomIndex, BondEndIndex, ItemRange};
use super::items::ColorClass;
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Side of the atom label on which implicit hydrogens are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HydroPosition {
    #[default]
    Right,
    Up,
    Left,
    Down,
}

impl HydroPosition {
    pub const ALL: [HydroPosition; 4] = [
        HydroPosition::Right,
        HydroPosition::Up,
        HydroPosition::Left,
        HydroPosition::Down,
    ];

    /// Unit vector pointing from the atom toward this side, y up.
    pub fn direction(self) -> Vector2<f32> {
        match self {
            HydroPosition::Right => Vector2::new(1.0, 0.0),
            HydroPosition::Up => Vector2::new(0.0, 1.0),
            HydroPosition::Left => Vector2::new(-1.0, 0.0),
            HydroPosition::Down => Vector2::new(0.0, -1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StereoGroupKind {
    Abs,
    Or,
    And,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StereoGroup {
    pub kind: StereoGroupKind,
    pub number: u32,
}

impl StereoGroup {
    /// Label text in the conventional `abs` / `orN` / `&N` notation.
    pub fn label(&self) -> String {
        match self.kind {
            StereoGroupKind::Abs => "abs".to_string(),
            StereoGroupKind::Or => format!("or{}", self.number),
            StereoGroupKind::And => format!("&{}", self.number),
        }
    }
}

/// Reaction stereo marker of an atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Inversion {
    #[default]
    Unmarked,
    Inverts,
    Retains,
}

/// How an atom is labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AtomKind {
    #[default]
    Regular,
    Pseudo,
    Query,
    RSite,
}

/// Render-time descriptor of one atom.
///
/// Owned items are referenced through [`ItemRange`]s into the flat arrays of
/// [`MoleculeRenderData`](super::render_data::MoleculeRenderData).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtomDesc {
    pub pos: Point2<f32>,
    pub kind: AtomKind,
    pub label: String,
    pub color: ColorClass,
    pub highlighted: bool,

    pub show_label: bool,
    pub show_hydro: bool,
    pub hydro_pos: HydroPosition,
    pub implicit_h: u32,
    /// Pseudo-atom text is printed verbatim instead of being split into symbol and indices.
    pub pseudo_verbose: bool,
    pub is_rgroup_attachment_point: bool,
    /// Position fixed by the layout; never moved by label placement.
    pub fixed: bool,
    /// Alternatives of a query atom list.
    pub atom_list: Vec<String>,
    pub nearby_atoms: Vec<AtomIndex>,
    /// Entry into the circular list of bond ends around this atom; `None` while isolated.
    pub first_bond_end: Option<BondEndIndex>,
    pub degree: usize,

    pub text_items: ItemRange,
    pub graph_items: ItemRange,
    pub attachment_points: ItemRange,
    pub rsite_attachment_indices: ItemRange,

    pub stereo_group: Option<StereoGroup>,
    pub aam: Option<u32>,
    pub inversion: Inversion,
    pub exact_change: bool,

    /// Placement weights of the four hydrogen sides, indexed by [`HydroPosition`].
    pub impl_h_pos_weights: [f32; 4],
    pub upper_sin: f32,
    pub lower_sin: f32,
    pub right_sin: f32,
    pub left_sin: f32,

    /// Label bounding box, relative to `pos`; zero-sized when the label is hidden.
    pub bbox_min: Vector2<f32>,
    pub bbox_max: Vector2<f32>,
}

impl Default for AtomDesc {
    fn default() -> Self {
        Self {
            pos: Point2::origin(),
            kind: AtomKind::Regular,
            label: String::new(),
            color: ColorClass::Base,
            highlighted: false,
            show_label: true,
            show_hydro: true,
            hydro_pos: HydroPosition::Right,
            implicit_h: 0,
            pseudo_verbose: false,
            is_rgroup_attachment_point: false,
            fixed: false,
            atom_list: Vec::new(),
            nearby_atoms: Vec::new(),
            first_bond_end: None,
            degree: 0,
            text_items: ItemRange::EMPTY,
            graph_items: ItemRange::EMPTY,
            attachment_points: ItemRange::EMPTY,
            rsite_attachment_indices: ItemRange::EMPTY,
            stereo_group: None,
            aam: None,
            inversion: Inversion::Unmarked,
            exact_change: false,
            impl_h_pos_weights: [0.0; 4],
            upper_sin: 0.0,
            lower_sin: 0.0,
            right_sin: 0.0,
            left_sin: 0.0,
            bbox_min: Vector2::zeros(),
            bbox_max: Vector2::zeros(),
        }
    }
}

impl AtomDesc {
    pub fn new(pos: Point2<f32>, label: impl Into<String>) -> Self {
        Self {
            pos,
            label: label.into(),
            ..Self::default()
        }
    }

    /// Resets every field, keeping the label and list allocations.
    pub fn clear(&mut self) {
        let mut label = std::mem::take(&mut self.label);
        let mut atom_list = std::mem::take(&mut self.atom_list);
        let mut nearby_atoms = std::mem::take(&mut self.nearby_atoms);
        label.clear();
        atom_list.clear();
        nearby_atoms.clear();
        *self = Self {
            label,
            atom_list,
            nearby_atoms,
            ..Self::default()
        };
    }

    /// Accounts for a bond leaving this atom along unit direction `dir` (y up).
    ///
    /// Each side accumulates how strongly bonds point into it; the side with the
    /// smallest sum is the least crowded.
    pub fn add_neighbor_direction(&mut self, dir: &Vector2<f32>) {
        if dir.y > 0.0 {
            self.upper_sin += dir.y;
        } else {
            self.lower_sin -= dir.y;
        }
        if dir.x > 0.0 {
            self.right_sin += dir.x;
        } else {
            self.left_sin -= dir.x;
        }
    }

    fn crowding(&self, side: HydroPosition) -> f32 {
        match side {
            HydroPosition::Right => self.right_sin,
            HydroPosition::Up => self.upper_sin,
            HydroPosition::Left => self.left_sin,
            HydroPosition::Down => self.lower_sin,
        }
    }

    /// Picks the hydrogen side.
    ///
    /// Right wins whenever no bond points noticeably to the right; otherwise the side
    /// with the least crowding adjusted by `impl_h_pos_weights` is chosen, preferring
    /// right, left, up, down on ties.
    pub fn choose_hydro_position(&self, min_sin: f32) -> HydroPosition {
        if self.right_sin < min_sin * 0.5 {
            return HydroPosition::Right;
        }
        let order = [
            HydroPosition::Right,
            HydroPosition::Left,
            HydroPosition::Up,
            HydroPosition::Down,
        ];
        let score =
            |side: HydroPosition| self.crowding(side) - self.impl_h_pos_weights[side as usize];
        order
            .into_iter()
            .fold(None::<(HydroPosition, f32)>, |best, side| {
                let s = score(side);
                match best {
                    Some((_, best_score)) if best_score <= s => best,
                    _ => Some((side, s)),
                }
            })
            .map_or(HydroPosition::Right, |(side, _)| side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_atom_desc_has_expected_defaults() {
        let a = AtomDesc::new(Point2::new(1.0, 2.0), "N");
        assert_eq!(a.pos, Point2::new(1.0, 2.0));
        assert_eq!(a.label, "N");
        assert!(a.show_label);
        assert!(a.show_hydro);
        assert_eq!(a.hydro_pos, HydroPosition::Right);
        assert_eq!(a.aam, None);
        assert_eq!(a.stereo_group, None);
        assert_eq!(a.inversion, Inversion::Unmarked);
        assert!(a.text_items.is_empty());
        assert!(a.graph_items.is_empty());
        assert!(a.attachment_points.is_empty());
        assert!(a.rsite_attachment_indices.is_empty());
        assert_eq!(a.impl_h_pos_weights, [0.0; 4]);
    }

    #[test]
    fn clear_resets_to_defaults_but_keeps_allocations() {
        let mut a = AtomDesc::new(Point2::new(3.0, 4.0), "Cl");
        a.nearby_atoms.extend([1, 2, 3]);
        a.aam = Some(7);
        a.show_label = false;
        a.text_items = ItemRange::new(2, 3);
        let capacity = a.nearby_atoms.capacity();
        a.clear();
        assert_eq!(a, AtomDesc::default());
        assert_eq!(a.nearby_atoms.capacity(), capacity);
    }

    #[test]
    fn neighbor_directions_accumulate_per_side() {
        let mut a = AtomDesc::default();
        a.add_neighbor_direction(&Vector2::new(1.0, 0.0));
        a.add_neighbor_direction(&Vector2::new(-0.5, 0.866));
        assert!((a.right_sin - 1.0).abs() < 1e-6);
        assert!((a.left_sin - 0.5).abs() < 1e-6);
        assert!((a.upper_sin - 0.866).abs() < 1e-6);
        assert_eq!(a.lower_sin, 0.0);
    }

    #[test]
    fn hydrogens_go_right_when_right_side_is_free() {
        let mut a = AtomDesc::default();
        a.add_neighbor_direction(&Vector2::new(-1.0, 0.0));
        assert_eq!(a.choose_hydro_position(0.6), HydroPosition::Right);
    }

    #[test]
    fn hydrogens_go_left_when_only_right_is_occupied() {
        let mut a = AtomDesc::default();
        a.add_neighbor_direction(&Vector2::new(1.0, 0.0));
        assert_eq!(a.choose_hydro_position(0.6), HydroPosition::Left);
    }

    #[test]
    fn hydrogens_avoid_crowded_sides() {
        let mut a = AtomDesc::default();
        a.add_neighbor_direction(&Vector2::new(0.866, -0.5));
        a.add_neighbor_direction(&Vector2::new(-0.866, -0.5));
        a.add_neighbor_direction(&Vector2::new(0.0, -1.0));
        assert_eq!(a.choose_hydro_position(0.6), HydroPosition::Up);
    }

    #[test]
    fn stereo_group_labels() {
        let abs = StereoGroup { kind: StereoGroupKind::Abs, number: 0 };
        let or = StereoGroup { kind: StereoGroupKind::Or, number: 2 };
        let and = StereoGroup { kind: StereoGroupKind::And, number: 1 };
        assert_eq!(abs.label(), "abs");
        assert_eq!(or.label(), "or2");
        assert_eq!(and.label(), "&1");
    }
}
