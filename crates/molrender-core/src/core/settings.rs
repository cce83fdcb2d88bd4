//! Dimensional constants of a depiction.
//!
//! [`RenderSettings`] turns one scale factor (pixels per bond length, with the relative
//! thickness already folded in) into every stroke width, font size, offset and dash
//! pattern the drawing backend needs. All lengths are linear in the scale, so changing
//! the scale zooms the whole diagram uniformly.

use serde::Serialize;

/// Font size classes, resolved to sizes by [`RenderSettings::font_size`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontSize {
    Label,
    Attr,
    RGroupLogic,
    RGroupLogicIndex,
    Indices,
    AttachmentPointIndex,
    RSiteAttachmentIndex,
    /// Sized by the comment font factor of the page, not by these settings.
    Comment,
    /// Sized by the title font factor of the page, not by these settings.
    Title,
    DataSGroup,
}

impl FontSize {
    pub const COUNT: usize = 10;

    pub const ALL: [FontSize; Self::COUNT] = [
        FontSize::Label,
        FontSize::Attr,
        FontSize::RGroupLogic,
        FontSize::RGroupLogicIndex,
        FontSize::Indices,
        FontSize::AttachmentPointIndex,
        FontSize::RSiteAttachmentIndex,
        FontSize::Comment,
        FontSize::Title,
        FontSize::DataSGroup,
    ];

    /// Font size as a multiple of the bond line width.
    fn ratio(self) -> f32 {
        match self {
            FontSize::Label | FontSize::RGroupLogic => 12.0,
            FontSize::Attr | FontSize::RGroupLogicIndex | FontSize::DataSGroup => 8.0,
            FontSize::Indices
            | FontSize::AttachmentPointIndex
            | FontSize::RSiteAttachmentIndex => 6.0,
            FontSize::Comment | FontSize::Title => 0.0,
        }
    }
}

/// Dashed stroke styles of query and aromatic bonds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DashStyle {
    Any,
    Aromatic,
    SingleOrAromatic,
    DoubleOrAromatic,
}

/// Dash patterns for the dashed bond styles, as alternating on/off segment lengths.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashPatterns {
    pub any: Vec<f32>,
    pub aromatic: Vec<f32>,
    pub single_or_aromatic: Vec<f32>,
    pub double_or_aromatic: Vec<f32>,
}

impl DashPatterns {
    const DASH: [u8; 2] = [3, 2];
    const DASH_DOT: [u8; 4] = [5, 2, 1, 2];

    /// Rewrites every pattern for `dash_unit`, reusing the existing allocations.
    pub fn refill(&mut self, dash_unit: f32) {
        let scaled = |units: &[u8], out: &mut Vec<f32>| {
            out.clear();
            out.extend(units.iter().map(|&u| u as f32 * dash_unit));
        };
        scaled(&Self::DASH, &mut self.any);
        scaled(&Self::DASH, &mut self.aromatic);
        scaled(&Self::DASH_DOT, &mut self.single_or_aromatic);
        scaled(&Self::DASH_DOT, &mut self.double_or_aromatic);
    }

    pub fn get(&self, style: DashStyle) -> &[f32] {
        match style {
            DashStyle::Any => &self.any,
            DashStyle::Aromatic => &self.aromatic,
            DashStyle::SingleOrAromatic => &self.single_or_aromatic,
            DashStyle::DoubleOrAromatic => &self.double_or_aromatic,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSettings {
    pub scale_factor: f32,

    pub bond_line_width: f32,
    pub bond_space: f32,
    font_sizes: [f32; FontSize::COUNT],

    pub upper_index_shift: f32,
    pub lower_index_shift: f32,
    pub bound_extent: f32,
    pub label_internal_offset: f32,
    pub stereo_group_label_offset: f32,
    pub radical_right_offset: f32,
    pub radical_right_vert_shift: f32,
    pub radical_top_offset: f32,
    pub radical_top_dist_dot: f32,
    pub radical_top_dist_cap: f32,
    pub dash_unit: f32,
    pub eps: f32,
    pub cosine_threshold: f32,
    pub prolong_adj_sin_threshold: f32,
    pub stereo_care_box_size: f32,
    pub min_bond_length: f32,

    pub graph_item_dot_radius: f32,
    pub graph_item_cap_slope: f32,
    pub graph_item_cap_base: f32,
    pub graph_item_cap_width: f32,
    pub graph_item_digit_width: f32,
    pub graph_item_digit_height: f32,
    pub graph_item_sign_line_width: f32,
    pub graph_item_plus_edge: f32,

    pub dashes: DashPatterns,

    pub layout_margin_horizontal: f32,
    pub layout_margin_vertical: f32,
    pub plus_size: f32,
    pub meta_line_width: f32,
    pub arrow_length: f32,
    pub arrow_head_width: f32,
    pub arrow_head_size: f32,
    pub equality_interval: f32,
    pub rgroup_if_then_interval: f32,
    pub neighboring_label_tolerance: f32,
    pub min_sin: f32,
    pub neighboring_atom_distance_threshold_a: f32,
    pub neighboring_atom_distance_threshold_b: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl RenderSettings {
    pub fn new(scale_factor: f32) -> Self {
        let mut settings = Self {
            scale_factor: 0.0,
            bond_line_width: 0.0,
            bond_space: 0.0,
            font_sizes: [0.0; FontSize::COUNT],
            upper_index_shift: 0.0,
            lower_index_shift: 0.0,
            bound_extent: 0.0,
            label_internal_offset: 0.0,
            stereo_group_label_offset: 0.0,
            radical_right_offset: 0.0,
            radical_right_vert_shift: 0.0,
            radical_top_offset: 0.0,
            radical_top_dist_dot: 0.0,
            radical_top_dist_cap: 0.0,
            dash_unit: 0.0,
            eps: 0.0,
            cosine_threshold: 0.0,
            prolong_adj_sin_threshold: 0.0,
            stereo_care_box_size: 0.0,
            min_bond_length: 0.0,
            graph_item_dot_radius: 0.0,
            graph_item_cap_slope: 0.0,
            graph_item_cap_base: 0.0,
            graph_item_cap_width: 0.0,
            graph_item_digit_width: 0.0,
            graph_item_digit_height: 0.0,
            graph_item_sign_line_width: 0.0,
            graph_item_plus_edge: 0.0,
            dashes: DashPatterns::default(),
            layout_margin_horizontal: 0.0,
            layout_margin_vertical: 0.0,
            plus_size: 0.0,
            meta_line_width: 0.0,
            arrow_length: 0.0,
            arrow_head_width: 0.0,
            arrow_head_size: 0.0,
            equality_interval: 0.0,
            rgroup_if_then_interval: 0.0,
            neighboring_label_tolerance: 0.0,
            min_sin: 0.0,
            neighboring_atom_distance_threshold_a: 0.0,
            neighboring_atom_distance_threshold_b: 0.0,
        };
        settings.init(scale_factor);
        settings
    }

    /// Re-derives every constant from `scale_factor`.
    ///
    /// The result depends on `scale_factor` alone; calling `init` twice with the same
    /// value yields identical settings.
    pub fn init(&mut self, scale_factor: f32) {
        self.scale_factor = scale_factor;
        let lw = scale_factor / 30.0;
        self.bond_line_width = lw;
        self.bond_space = 2.5 * lw;

        for size in FontSize::ALL {
            self.font_sizes[size as usize] = lw * size.ratio();
        }

        self.upper_index_shift = -0.4;
        self.lower_index_shift = 0.4;
        self.bound_extent = 1.3 * lw;
        self.label_internal_offset = lw;
        self.stereo_group_label_offset = 2.0 * lw;
        self.radical_right_offset = lw / 2.0;
        self.radical_right_vert_shift = -0.2;
        self.radical_top_offset = 0.8 * lw;
        self.radical_top_dist_dot = lw;
        self.radical_top_dist_cap = lw / 2.0;
        self.dash_unit = lw;
        self.eps = 1e-4;
        self.cosine_threshold = 0.98;
        self.prolong_adj_sin_threshold = 0.2;
        self.stereo_care_box_size = self.bond_space * 3.0 + lw * 3.0;
        self.min_bond_length = lw * 5.0;

        self.graph_item_dot_radius = lw;
        self.graph_item_cap_slope = 2.0;
        self.graph_item_cap_base = 0.7 * lw;
        self.graph_item_cap_width = 1.2 * lw;
        self.graph_item_digit_width = 4.5 * lw;
        self.graph_item_digit_height = 6.5 * lw;
        self.graph_item_sign_line_width = 0.8 * lw;
        self.graph_item_plus_edge =
            (self.graph_item_digit_width - self.graph_item_sign_line_width) / 2.0;

        self.dashes.refill(self.dash_unit);

        // Reaction-layout metrics are in bond-length units and do not scale.
        self.layout_margin_horizontal = 0.4;
        self.layout_margin_vertical = 0.6;
        self.plus_size = 0.5;
        self.meta_line_width = 1.0 / 16.0;
        self.arrow_length = 3.0 * self.plus_size;
        self.arrow_head_width = self.plus_size / 2.0;
        self.arrow_head_size = self.plus_size / 2.0;
        self.equality_interval = self.plus_size / 2.0;
        self.rgroup_if_then_interval = lw * 4.0;
        self.neighboring_label_tolerance = 1.3;
        self.min_sin = 0.6;
        self.neighboring_atom_distance_threshold_a = 0.8;
        self.neighboring_atom_distance_threshold_b = 0.5;
    }

    #[inline]
    pub fn font_size(&self, size: FontSize) -> f32 {
        self.font_sizes[size as usize]
    }
}
