//! Secondary drawable annotations: labels, glyphs, attachment markers and brackets.
//!
//! Every annotation except the bracket embeds an [`ItemEnvelope`] carrying its bounding
//! box, its position relative to the anchor atom or bond, and its color class. Brackets
//! carry only their own geometry and are always drawn in the base color.

use crate::core::settings::FontSize;
use nalgebra::{Point2, Vector2};
use serde::Serialize;

/// Palette-relative color, resolved to an actual color by the drawing backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorClass {
    Background,
    #[default]
    Base,
    White,
    Black,
    Red,
    Green,
    Blue,
    DarkGreen,
    /// Atom-to-atom mapping indices.
    Aam,
    Comment,
}

impl ColorClass {
    /// Conventional element coloring used when coloring is enabled.
    pub fn for_element(symbol: &str) -> Self {
        match symbol {
            "N" => ColorClass::Blue,
            "O" => ColorClass::Red,
            "F" | "Cl" => ColorClass::Green,
            "Br" | "I" => ColorClass::DarkGreen,
            _ => ColorClass::Base,
        }
    }
}

/// What an annotation depicts; backends use it to pick fonts and stacking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemRole {
    #[default]
    Null,
    Label,
    Hydrogen,
    HydroIndex,
    Isotope,
    ChargeSign,
    ChargeValue,
    Radical,
    StereoGroup,
    Valence,
    Chirality,
    Aam,
    Inversion,
    ExactChange,
    ReactingCenter,
    AttachmentPoint,
    RSiteAttachmentIndex,
    AtomId,
    BondId,
    Topology,
    SGroupIndex,
    DataSGroup,
    Comment,
    Title,
}

/// Fields shared by every annotation but the bracket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemEnvelope {
    pub role: ItemRole,
    /// Bounding box position.
    pub bbp: Point2<f32>,
    /// Bounding box size.
    pub bbsz: Vector2<f32>,
    /// Offset from the anchor atom or bond.
    pub relpos: Vector2<f32>,
    pub color: ColorClass,
    pub highlighted: bool,
    /// Keeps bonds from being shortened around this item.
    pub no_bond_offset: bool,
}

impl Default for ItemEnvelope {
    fn default() -> Self {
        Self {
            role: ItemRole::Null,
            bbp: Point2::origin(),
            bbsz: Vector2::zeros(),
            relpos: Vector2::zeros(),
            color: ColorClass::Base,
            highlighted: false,
            no_bond_offset: false,
        }
    }
}

impl ItemEnvelope {
    pub fn with_role(role: ItemRole) -> Self {
        Self {
            role,
            ..Self::default()
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Places the bounding box so that it is centered on `anchor + relpos`.
    pub fn center_on(&mut self, anchor: &Point2<f32>) {
        self.bbp = anchor + self.relpos - self.bbsz / 2.0;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextItem {
    pub base: ItemEnvelope,
    pub text: String,
    pub font_size: FontSize,
}

impl Default for TextItem {
    fn default() -> Self {
        Self {
            base: ItemEnvelope::default(),
            text: String::new(),
            font_size: FontSize::Label,
        }
    }
}

impl TextItem {
    pub fn new(role: ItemRole, text: impl Into<String>, font_size: FontSize) -> Self {
        Self {
            base: ItemEnvelope::with_role(role),
            text: text.into(),
            font_size,
        }
    }

    /// Resets to an empty label, keeping the text allocation.
    pub fn clear(&mut self) {
        self.base.clear();
        self.text.clear();
        self.font_size = FontSize::Label;
    }
}

/// Shape of a non-text glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GraphKind {
    #[default]
    Dot,
    Cap,
    Plus,
    Minus,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GraphItem {
    pub base: ItemEnvelope,
    pub kind: GraphKind,
}

impl GraphItem {
    pub fn new(role: ItemRole, kind: GraphKind) -> Self {
        Self {
            base: ItemEnvelope::with_role(role),
            kind,
        }
    }

    pub fn clear(&mut self) {
        self.base.clear();
        self.kind = GraphKind::Dot;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttachmentPointItem {
    pub base: ItemEnvelope,
    /// Attachment point ordinal; `None` while unassigned.
    pub number: Option<u32>,
    pub dir: Vector2<f32>,
    pub p0: Point2<f32>,
    pub p1: Point2<f32>,
}

impl Default for AttachmentPointItem {
    fn default() -> Self {
        Self {
            base: ItemEnvelope::with_role(ItemRole::AttachmentPoint),
            number: None,
            dir: Vector2::zeros(),
            p0: Point2::origin(),
            p1: Point2::origin(),
        }
    }
}

impl AttachmentPointItem {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Numeral in a small circle marking an R-group attachment order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RSiteAttachmentIndexItem {
    pub base: ItemEnvelope,
    pub number: Option<u32>,
    pub radius: f32,
}

impl Default for RSiteAttachmentIndexItem {
    fn default() -> Self {
        Self {
            base: ItemEnvelope::with_role(ItemRole::RSiteAttachmentIndex),
            number: None,
            radius: 0.0,
        }
    }
}

impl RSiteAttachmentIndexItem {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// One half of a polymer repeat-unit bracket pair.
///
/// `p0`–`p1` is the bracket spine; `q0` and `q1` are the tips of the caps at each end,
/// pointing along the inward normal `n`. `d` is the unit spine direction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BracketItem {
    pub p0: Point2<f32>,
    pub p1: Point2<f32>,
    pub q0: Point2<f32>,
    pub q1: Point2<f32>,
    pub d: Vector2<f32>,
    pub n: Vector2<f32>,
    pub length: f32,
    pub width: f32,
}

impl Default for BracketItem {
    fn default() -> Self {
        Self {
            p0: Point2::origin(),
            p1: Point2::origin(),
            q0: Point2::origin(),
            q1: Point2::origin(),
            d: Vector2::zeros(),
            n: Vector2::zeros(),
            length: 0.0,
            width: 0.0,
        }
    }
}

impl BracketItem {
    /// A bracket whose spine runs from `p0` along `d` for `length`, with caps of `width`
    /// pointing along `n`.
    pub fn new(p0: Point2<f32>, d: Vector2<f32>, n: Vector2<f32>, length: f32, width: f32) -> Self {
        let p1 = p0 + d * length;
        Self {
            p0,
            p1,
            q0: p0 + n * width,
            q1: p1 + n * width,
            d,
            n,
            length,
            width,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Borrowed view over any annotation kind, for backends that draw them uniformly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderItemRef<'a> {
    Text(&'a TextItem),
    Graph(&'a GraphItem),
    AttachmentPoint(&'a AttachmentPointItem),
    RSiteAttachmentIndex(&'a RSiteAttachmentIndexItem),
    Bracket(&'a BracketItem),
}

impl<'a> RenderItemRef<'a> {
    /// The shared envelope; brackets have none.
    pub fn envelope(&self) -> Option<&'a ItemEnvelope> {
        match self {
            Self::Text(t) => Some(&t.base),
            Self::Graph(g) => Some(&g.base),
            Self::AttachmentPoint(a) => Some(&a.base),
            Self::RSiteAttachmentIndex(r) => Some(&r.base),
            Self::Bracket(_) => None,
        }
    }

    pub fn color(&self) -> ColorClass {
        self.envelope().map_or(ColorClass::Base, |e| e.color)
    }

    pub fn is_highlighted(&self) -> bool {
        self.envelope().is_some_and(|e| e.highlighted)
    }
}
