use super::ids::{AtomIndex, BondEndIndex, BondIndex, RingIndex};
use crate::core::settings::DashStyle;
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use std::fmt;
use thiserror::Error;

/// Angle reported for a side with no neighboring bond.
pub const ANGLE_UNSET: f32 = TAU;
/// Cosine reported for a side with no neighboring bond.
pub const COS_UNSET: f32 = -1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BondOrder {
    #[default]
    Single,
    Double,
    Triple,
    Aromatic,
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Single => "Single",
                Self::Double => "Double",
                Self::Triple => "Triple",
                Self::Aromatic => "Aromatic",
            }
        )
    }
}

impl BondOrder {
    /// Contribution to the bond order sum of an atom; aromatic bonds count as one and
    /// a half, rounded per atom by the caller.
    pub fn valence_halves(self) -> u32 {
        match self {
            Self::Single => 2,
            Self::Double => 4,
            Self::Triple => 6,
            Self::Aromatic => 3,
        }
    }
}

/// Query bond alternatives that are drawn with dash patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueryBondType {
    Any,
    SingleOrDouble,
    SingleOrAromatic,
    DoubleOrAromatic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StereoDirection {
    #[default]
    None,
    /// Wedge, narrow end at the begin atom.
    Up,
    /// Hashed wedge, narrow end at the begin atom.
    Down,
    /// Wavy line.
    Either,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BondTopology {
    #[default]
    Either,
    Ring,
    Chain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReactingCenter {
    #[default]
    Unmarked,
    NotCenter,
    Center,
    Unchanged,
    MadeOrBroken,
    OrderChanged,
    MadeOrBrokenAndOrderChanged,
}

/// Angular neighbor of a bond end on one side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NeighborAngle {
    pub bond_end: BondEndIndex,
    /// Angle swept to the neighbor, in `(0, 2π]`.
    pub angle: f32,
    pub cos: f32,
    pub sin: f32,
}

impl NeighborAngle {
    pub fn new(bond_end: BondEndIndex, angle: f32) -> Self {
        Self {
            bond_end,
            angle,
            cos: angle.cos(),
            sin: angle.sin(),
        }
    }
}

/// One endpoint of a bond, anchored at `atom` and pointing toward the other atom.
///
/// Bond ends around an atom form a circular list through `next`, ordered by
/// ascending polar angle. `left` is the neighbor reached by turning counter-clockwise,
/// `right` the one reached clockwise; both are `None` until linking and stay `None`
/// for an atom with a single bond.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BondEnd {
    pub bond: BondIndex,
    pub atom: AtomIndex,
    pub other_atom: AtomIndex,
    /// Anchor point, the position of `atom`.
    pub p: Point2<f32>,
    /// Unit direction toward `other_atom`.
    pub dir: Vector2<f32>,
    /// Left normal of `dir`.
    pub lnorm: Vector2<f32>,

    /// Ring lying on the left of this bond end.
    pub l_ring: Option<RingIndex>,
    pub next: Option<BondEndIndex>,
    pub left: Option<NeighborAngle>,
    pub right: Option<NeighborAngle>,

    pub centered: bool,
    pub prolong: bool,
    pub offset: f32,
    pub width: f32,
}

impl BondEnd {
    pub fn new(
        bond: BondIndex,
        atom: AtomIndex,
        other_atom: AtomIndex,
        p: Point2<f32>,
        toward: Point2<f32>,
    ) -> Self {
        let delta = toward - p;
        let len = delta.norm();
        let dir = if len > 0.0 { delta / len } else { Vector2::zeros() };
        Self {
            bond,
            atom,
            other_atom,
            p,
            dir,
            lnorm: Vector2::new(-dir.y, dir.x),
            l_ring: None,
            next: None,
            left: None,
            right: None,
            centered: false,
            prolong: false,
            offset: 0.0,
            width: 0.0,
        }
    }

    /// Resets the linking and style state, keeping identity and geometry.
    pub fn clear(&mut self) {
        self.l_ring = None;
        self.next = None;
        self.left = None;
        self.right = None;
        self.centered = false;
        self.prolong = false;
        self.offset = 0.0;
        self.width = 0.0;
    }

    pub fn lang(&self) -> f32 {
        self.left.map_or(ANGLE_UNSET, |n| n.angle)
    }

    pub fn rang(&self) -> f32 {
        self.right.map_or(ANGLE_UNSET, |n| n.angle)
    }

    pub fn lcos(&self) -> f32 {
        self.left.map_or(COS_UNSET, |n| n.cos)
    }

    pub fn rcos(&self) -> f32 {
        self.right.map_or(COS_UNSET, |n| n.cos)
    }

    pub fn lsin(&self) -> f32 {
        self.left.map_or(0.0, |n| n.sin)
    }

    pub fn rsin(&self) -> f32 {
        self.right.map_or(0.0, |n| n.sin)
    }

    pub fn lnei(&self) -> Option<BondEndIndex> {
        self.left.map(|n| n.bond_end)
    }

    pub fn rnei(&self) -> Option<BondEndIndex> {
        self.right.map(|n| n.bond_end)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BondEndError {
    #[error("Atom {atom} is not adjacent to bond {bond}")]
    NotAdjacent { atom: AtomIndex, bond: BondIndex },
}

/// Render-time descriptor of one bond.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BondDescr {
    pub index: BondIndex,
    pub beg: AtomIndex,
    pub end: AtomIndex,
    pub be1: BondEndIndex,
    pub be2: BondEndIndex,

    pub order: BondOrder,
    pub query_type: Option<QueryBondType>,
    pub in_ring: bool,
    pub arom_ring: bool,
    pub stereo_care: bool,
    /// Stroke width override; zero uses the default bond line width.
    pub thickness: f32,
    pub stereodir: StereoDirection,
    pub cistrans: bool,
    pub centered: bool,
    /// Extension of the stroke past the begin atom. Label clearance is kept in
    /// [`BondEnd::offset`]; this stays zero unless a backend extends the stroke.
    pub ext_p: f32,
    /// Extension of the stroke past the end atom.
    pub ext_n: f32,
    /// Side of the second line of a double bond: `1` left of the begin-to-end axis,
    /// `-1` right, `0` when centered or single.
    pub double_side: i8,
    /// Trimmed second line of an offset double or dashed aromatic bond.
    pub second_line: Option<[Point2<f32>; 2]>,
    pub line_dash: Option<DashStyle>,
    pub second_line_dash: Option<DashStyle>,
    pub topology: BondTopology,
    /// Text item carrying the topology mark, if any.
    pub ti_topology: Option<usize>,
    /// Text item carrying the bond id, if any.
    pub ti_id: Option<usize>,
    pub reacting_center: ReactingCenter,
    pub highlighted: bool,

    pub center: Point2<f32>,
    pub dir: Vector2<f32>,
    pub norm: Vector2<f32>,
    pub length: f32,
}

impl BondDescr {
    pub fn new(
        index: BondIndex,
        beg: AtomIndex,
        end: AtomIndex,
        be1: BondEndIndex,
        be2: BondEndIndex,
        p_beg: Point2<f32>,
        p_end: Point2<f32>,
    ) -> Self {
        let delta = p_end - p_beg;
        let length = delta.norm();
        let dir = if length > 0.0 { delta / length } else { Vector2::zeros() };
        Self {
            index,
            beg,
            end,
            be1,
            be2,
            order: BondOrder::Single,
            query_type: None,
            in_ring: false,
            arom_ring: false,
            stereo_care: false,
            thickness: 0.0,
            stereodir: StereoDirection::None,
            cistrans: false,
            centered: false,
            ext_p: 0.0,
            ext_n: 0.0,
            double_side: 0,
            second_line: None,
            line_dash: None,
            second_line_dash: None,
            topology: BondTopology::Either,
            ti_topology: None,
            ti_id: None,
            reacting_center: ReactingCenter::Unmarked,
            highlighted: false,
            center: nalgebra::center(&p_beg, &p_end),
            dir,
            norm: Vector2::new(-dir.y, dir.x),
            length,
        }
    }

    /// Resets the chemistry and style flags, keeping endpoints and geometry.
    pub fn clear(&mut self) {
        self.order = BondOrder::Single;
        self.query_type = None;
        self.in_ring = false;
        self.arom_ring = false;
        self.stereo_care = false;
        self.thickness = 0.0;
        self.stereodir = StereoDirection::None;
        self.cistrans = false;
        self.centered = false;
        self.ext_p = 0.0;
        self.ext_n = 0.0;
        self.double_side = 0;
        self.second_line = None;
        self.line_dash = None;
        self.second_line_dash = None;
        self.topology = BondTopology::Either;
        self.ti_topology = None;
        self.ti_id = None;
        self.reacting_center = ReactingCenter::Unmarked;
        self.highlighted = false;
    }

    /// The bond end anchored at `atom`.
    ///
    /// # Errors
    ///
    /// Returns [`BondEndError::NotAdjacent`] if `atom` is neither endpoint of this bond.
    pub fn get_bond_end(&self, atom: AtomIndex) -> Result<BondEndIndex, BondEndError> {
        if atom == self.beg {
            Ok(self.be1)
        } else if atom == self.end {
            Ok(self.be2)
        } else {
            Err(BondEndError::NotAdjacent {
                atom,
                bond: self.index,
            })
        }
    }

    pub fn other_atom(&self, atom: AtomIndex) -> Result<AtomIndex, BondEndError> {
        if atom == self.beg {
            Ok(self.end)
        } else if atom == self.end {
            Ok(self.beg)
        } else {
            Err(BondEndError::NotAdjacent {
                atom,
                bond: self.index,
            })
        }
    }

    /// Plain double bond; query bonds never count toward a ring's double bonds.
    pub fn is_double_like(&self) -> bool {
        self.order == BondOrder::Double && self.query_type.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn ethene_bond() -> BondDescr {
        BondDescr::new(
            0,
            0,
            1,
            0,
            1,
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
        )
    }

    #[test]
    fn get_bond_end_resolves_both_endpoints() {
        let b = ethene_bond();
        assert_eq!(b.get_bond_end(0), Ok(0));
        assert_eq!(b.get_bond_end(1), Ok(1));
    }

    #[test]
    fn get_bond_end_rejects_unrelated_atom() {
        let b = ethene_bond();
        assert_eq!(
            b.get_bond_end(5),
            Err(BondEndError::NotAdjacent { atom: 5, bond: 0 })
        );
        assert!(b.other_atom(2).is_err());
        assert_eq!(b.other_atom(0), Ok(1));
    }

    #[test]
    fn new_bond_has_neutral_style_and_geometry() {
        let b = ethene_bond();
        assert_eq!(b.ext_p, 0.0);
        assert_eq!(b.ext_n, 0.0);
        assert_eq!(b.length, 1.0);
        assert_eq!(b.center, Point2::new(0.5, 0.0));
        assert_eq!(b.norm, Vector2::new(0.0, 1.0));
        assert_eq!(b.reacting_center, ReactingCenter::Unmarked);
    }

    #[test]
    fn unlinked_bond_end_reports_sentinels() {
        let be = BondEnd::new(0, 0, 1, Point2::origin(), Point2::new(2.0, 0.0));
        assert_eq!(be.lang(), 2.0 * PI);
        assert_eq!(be.rang(), 2.0 * PI);
        assert_eq!(be.lcos(), -1.0);
        assert_eq!(be.rcos(), -1.0);
        assert_eq!(be.lsin(), 0.0);
        assert_eq!(be.lnei(), None);
        assert_eq!(be.dir, Vector2::new(1.0, 0.0));
        assert_eq!(be.lnorm, Vector2::new(0.0, 1.0));
    }

    #[test]
    fn neighbor_angle_caches_trigonometry() {
        let n = NeighborAngle::new(3, 2.0 * PI / 3.0);
        assert!((n.cos + 0.5).abs() < 1e-6);
        assert!((n.sin - 0.866_025).abs() < 1e-5);
        assert_eq!(n.bond_end, 3);
    }

    #[test]
    fn bond_end_clear_drops_links() {
        let mut be = BondEnd::new(0, 0, 1, Point2::origin(), Point2::new(0.0, 1.0));
        be.left = Some(NeighborAngle::new(1, 1.0));
        be.next = Some(1);
        be.l_ring = Some(0);
        be.prolong = true;
        be.clear();
        assert_eq!(be.left, None);
        assert_eq!(be.next, None);
        assert_eq!(be.l_ring, None);
        assert!(!be.prolong);
    }

    #[test]
    fn query_double_bond_is_not_double_like() {
        let mut b = ethene_bond();
        assert!(!b.is_double_like());
        b.order = BondOrder::Double;
        assert!(b.is_double_like());
        b.query_type = Some(QueryBondType::DoubleOrAromatic);
        assert!(!b.is_double_like());
    }

    #[test]
    fn bond_order_display_names() {
        assert_eq!(BondOrder::Double.to_string(), "Double");
        assert_eq!(BondOrder::Aromatic.to_string(), "Aromatic");
    }
}
