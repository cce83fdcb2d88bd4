use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

const DEFAULT_TITLE_TEMPLATE: &str = "^NAME";
const TITLE_TOKEN_PREFIX: char = '^';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommentPosition {
    Top,
    #[default]
    Bottom,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid comment position '{0}'. Expected 'top' or 'bottom'.")]
pub struct ParseCommentPositionError(pub String);

impl FromStr for CommentPosition {
    type Err = ParseCommentPositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            _ => Err(ParseCommentPositionError(s.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid alignment '{0}'. Expected 'left', 'center', 'right' or a number in [0, 1].")]
pub struct ParseAlignmentError(pub String);

/// Parses a horizontal alignment keyword into its fraction of the page width.
pub fn parse_alignment(s: &str) -> Result<f32, ParseAlignmentError> {
    match s.to_ascii_lowercase().as_str() {
        "left" => Ok(0.0),
        "center" | "centre" => Ok(0.5),
        "right" => Ok(1.0),
        other => other
            .parse::<f32>()
            .ok()
            .filter(|v| (0.0..=1.0).contains(v))
            .ok_or_else(|| ParseAlignmentError(s.to_string())),
    }
}

/// Page-level layout of one rendering invocation, independent of molecule content.
///
/// Negative `width`/`height`/`bond_length` mean "derive automatically".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct CanvasOptions {
    pub width: i32,
    pub height: i32,
    pub x_offset: i32,
    pub y_offset: i32,
    pub bond_length: f32,
    pub grid_margin_x: i32,
    pub grid_margin_y: i32,
    pub margin_x: i32,
    pub margin_y: i32,
    pub comment_offset: i32,
    pub comment_pos: CommentPosition,
    pub comment_align: f32,
    pub title_align: f32,
    pub title_offset: i32,
    pub grid_column_number: usize,
    pub comment: String,
    /// Title template; `^KEY` tokens are replaced by the structure property `KEY`.
    pub title_prop: String,
}

impl Default for CanvasOptions {
    fn default() -> Self {
        Self {
            width: -1,
            height: -1,
            x_offset: 0,
            y_offset: 0,
            bond_length: -1.0,
            grid_margin_x: 0,
            grid_margin_y: 0,
            margin_x: 0,
            margin_y: 0,
            comment_offset: 0,
            comment_pos: CommentPosition::Bottom,
            comment_align: 0.5,
            title_align: 0.5,
            title_offset: 0,
            grid_column_number: 1,
            comment: String::new(),
            title_prop: DEFAULT_TITLE_TEMPLATE.to_string(),
        }
    }
}

impl CanvasOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores every field to its default, keeping string allocations.
    pub fn clear(&mut self) {
        let mut comment = std::mem::take(&mut self.comment);
        let mut title_prop = std::mem::take(&mut self.title_prop);
        comment.clear();
        title_prop.clear();
        title_prop.push_str(DEFAULT_TITLE_TEMPLATE);
        *self = Self {
            comment,
            title_prop,
            ..Self::default()
        };
    }

    pub fn has_fixed_size(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn has_fixed_bond_length(&self) -> bool {
        self.bond_length > 0.0
    }

    /// Expands the title template for a structure.
    ///
    /// A token is the `^` prefix followed by the longest run of alphanumerics, `_` or `-`.
    /// `NAME` resolves to `name`; other keys are looked up in `properties`. Unknown keys
    /// expand to an empty string. A `^` not followed by a key character is kept literally.
    pub fn title_for<'a, P>(&self, name: &str, properties: P) -> String
    where
        P: IntoIterator<Item = (&'a str, &'a str)> + Clone,
    {
        let lookup = |key: &str| -> Option<String> {
            if key == "NAME" {
                return Some(name.to_string());
            }
            properties
                .clone()
                .into_iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        };

        let mut out = String::with_capacity(self.title_prop.len() + name.len());
        let mut chars = self.title_prop.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            if c != TITLE_TOKEN_PREFIX {
                out.push(c);
                continue;
            }
            let start = i + c.len_utf8();
            let mut end = start;
            while let Some(&(j, k)) = chars.peek() {
                if k.is_alphanumeric() || k == '_' || k == '-' {
                    end = j + k.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            if end == start {
                out.push(c);
            } else if let Some(value) = lookup(&self.title_prop[start..end]) {
                out.push_str(&value);
            }
        }
        out
    }

    /// Largest bond length at which a structure spanning `extent` bond lengths fits the
    /// fixed page inside its margins; `None` without a fixed size or a usable extent.
    pub fn fit_bond_length(&self, extent: Vector2<f32>) -> Option<f32> {
        if !self.has_fixed_size() {
            return None;
        }
        let room_x = (self.width - 2 * self.margin_x) as f32;
        let room_y = (self.height - 2 * self.margin_y) as f32;
        if room_x <= 0.0 || room_y <= 0.0 {
            return None;
        }
        let fit = |room: f32, span: f32| if span > 0.0 { room / span } else { f32::INFINITY };
        let bond = fit(room_x, extent.x).min(fit(room_y, extent.y));
        bond.is_finite().then_some(bond)
    }

    /// Grid `(row, column)` of the `index`-th structure in a batch page.
    pub fn grid_cell(&self, index: usize) -> (usize, usize) {
        let columns = self.grid_column_number.max(1);
        (index / columns, index % columns)
    }
}
