use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Parameter '{name}' must be positive (got {value})")]
    NonPositive { name: &'static str, value: f32 },
    #[error("Invalid value '{value}' for {name}; expected one of: {expected}")]
    InvalidValue {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

macro_rules! keyword_enum {
    ($(#[$meta:meta])* $name:ident, $label:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const KEYWORDS: &'static str = concat!($($text, " "),+);
        }

        impl FromStr for $name {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(ConfigError::InvalidValue {
                        name: $label,
                        value: s.to_string(),
                        expected: Self::KEYWORDS,
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($text),)+
                }
            }
        }
    };
}

keyword_enum!(
    /// Which carbon labels are drawn.
    LabelMode, "label mode" {
        Normal => "normal",
        ForceShow => "forceshow",
        HideTerminal => "hideterminal",
        ForceHide => "forcehide",
    }
);

keyword_enum!(
    /// Which visible labels get their implicit hydrogens written out.
    HydroMode, "implicit hydrogen mode" {
        None => "none",
        Terminal => "terminal",
        Hetero => "hetero",
        TerminalHetero => "terminalhetero",
        All => "all",
    }
);

keyword_enum!(
    /// Stereo annotation style: `old` draws wedges only, `ext` also labels stereo groups.
    StereoStyle, "stereo style" {
        Old => "old",
        Ext => "ext",
    }
);

impl Default for LabelMode {
    fn default() -> Self {
        Self::Normal
    }
}

impl Default for HydroMode {
    fn default() -> Self {
        Self::TerminalHetero
    }
}

impl Default for StereoStyle {
    fn default() -> Self {
        Self::Old
    }
}

/// Options of one render pass, independent of the page layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderOptions {
    pub label_mode: LabelMode,
    pub hydro_mode: HydroMode,
    pub stereo_style: StereoStyle,
    /// Center double bonds that touch a stereo bond.
    pub center_double_bond_when_stereo_adjacent: bool,
    pub show_atom_ids: bool,
    pub show_bond_ids: bool,
    pub atom_coloring: bool,
    /// Draw highlighted bonds thicker instead of recoloring them.
    pub highlight_thickness: bool,
    pub relative_thickness: f32,
    /// Target bond length in pixels.
    pub bond_length: f32,
}

impl RenderOptions {
    /// Scale factor handed to [`RenderSettings::init`](crate::core::settings::RenderSettings::init).
    pub fn scale_factor(&self) -> f32 {
        self.bond_length * self.relative_thickness
    }
}

#[derive(Default)]
pub struct RenderOptionsBuilder {
    label_mode: Option<LabelMode>,
    hydro_mode: Option<HydroMode>,
    stereo_style: Option<StereoStyle>,
    center_double_bond_when_stereo_adjacent: Option<bool>,
    show_atom_ids: Option<bool>,
    show_bond_ids: Option<bool>,
    atom_coloring: Option<bool>,
    highlight_thickness: Option<bool>,
    relative_thickness: Option<f32>,
    bond_length: Option<f32>,
}

impl RenderOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label_mode(mut self, mode: LabelMode) -> Self {
        self.label_mode = Some(mode);
        self
    }
    pub fn hydro_mode(mut self, mode: HydroMode) -> Self {
        self.hydro_mode = Some(mode);
        self
    }
    pub fn stereo_style(mut self, style: StereoStyle) -> Self {
        self.stereo_style = Some(style);
        self
    }
    pub fn center_double_bond_when_stereo_adjacent(mut self, enabled: bool) -> Self {
        self.center_double_bond_when_stereo_adjacent = Some(enabled);
        self
    }
    pub fn show_atom_ids(mut self, enabled: bool) -> Self {
        self.show_atom_ids = Some(enabled);
        self
    }
    pub fn show_bond_ids(mut self, enabled: bool) -> Self {
        self.show_bond_ids = Some(enabled);
        self
    }
    pub fn atom_coloring(mut self, enabled: bool) -> Self {
        self.atom_coloring = Some(enabled);
        self
    }
    pub fn highlight_thickness(mut self, enabled: bool) -> Self {
        self.highlight_thickness = Some(enabled);
        self
    }
    pub fn relative_thickness(mut self, factor: f32) -> Self {
        self.relative_thickness = Some(factor);
        self
    }
    pub fn bond_length(mut self, pixels: f32) -> Self {
        self.bond_length = Some(pixels);
        self
    }

    pub fn build(self) -> Result<RenderOptions, ConfigError> {
        let bond_length = self
            .bond_length
            .ok_or(ConfigError::MissingParameter("bond_length"))?;
        if bond_length <= 0.0 || !bond_length.is_finite() {
            return Err(ConfigError::NonPositive {
                name: "bond_length",
                value: bond_length,
            });
        }
        let relative_thickness = self.relative_thickness.unwrap_or(1.0);
        if relative_thickness <= 0.0 || !relative_thickness.is_finite() {
            return Err(ConfigError::NonPositive {
                name: "relative_thickness",
                value: relative_thickness,
            });
        }
        Ok(RenderOptions {
            label_mode: self.label_mode.unwrap_or_default(),
            hydro_mode: self.hydro_mode.unwrap_or_default(),
            stereo_style: self.stereo_style.unwrap_or_default(),
            center_double_bond_when_stereo_adjacent: self
                .center_double_bond_when_stereo_adjacent
                .unwrap_or(false),
            show_atom_ids: self.show_atom_ids.unwrap_or(false),
            show_bond_ids: self.show_bond_ids.unwrap_or(false),
            atom_coloring: self.atom_coloring.unwrap_or(false),
            highlight_thickness: self.highlight_thickness.unwrap_or(false),
            relative_thickness,
            bond_length,
        })
    }
}
