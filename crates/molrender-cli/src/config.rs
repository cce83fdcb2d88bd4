use crate::cli::PrepareArgs;
use crate::error::{CliError, Result};
use molrender::core::canvas::{CanvasOptions, parse_alignment};
use molrender::core::models::structure::Structure;
use molrender::engine::config::{
    HydroMode, LabelMode, RenderOptions, RenderOptionsBuilder, StereoStyle,
};
use serde::Deserialize;
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Bond length used when neither a flag, the config file nor a fixed page decides it.
pub const DEFAULT_BOND_LENGTH: f32 = 30.0;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialRenderOptions {
    label_mode: Option<LabelMode>,
    hydro_mode: Option<HydroMode>,
    stereo_style: Option<StereoStyle>,
    center_double_bond: Option<bool>,
    show_atom_ids: Option<bool>,
    show_bond_ids: Option<bool>,
    atom_coloring: Option<bool>,
    highlight_thickness: Option<bool>,
    relative_thickness: Option<f32>,
    bond_length: Option<f32>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PartialRenderConfig {
    render: Option<PartialRenderOptions>,
    canvas: Option<CanvasOptions>,
}

/// Options of one `prepare` run after every source has been merged.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub options: RenderOptions,
    pub canvas: CanvasOptions,
}

impl PartialRenderConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Merges flags over `-S` values over the file over defaults.
    ///
    /// The bond length falls back to the largest one at which every structure fits a
    /// fixed page, then to [`DEFAULT_BOND_LENGTH`].
    pub fn merge_with_cli(
        mut self,
        args: &PrepareArgs,
        structures: &[Structure],
    ) -> Result<ResolvedConfig> {
        self.apply_set_values(&args.set_values)?;
        let render = self.render.unwrap_or_default();
        let mut canvas = self.canvas.unwrap_or_default();

        if let (Some(width), Some(height)) = (args.width, args.height) {
            canvas.width = width;
            canvas.height = height;
        }
        if let Some(pos) = args.comment_pos {
            canvas.comment_pos = pos;
        }
        if let Some(align) = args.comment_align {
            canvas.comment_align = align;
        }
        if let Some(align) = args.title_align {
            canvas.title_align = align;
        }
        if let Some(title) = &args.title {
            canvas.title_prop.clone_from(title);
        }
        if let Some(comment) = &args.comment {
            canvas.comment.clone_from(comment);
        }

        let bond_length = match args.bond.or(render.bond_length) {
            Some(bond) => bond,
            None if canvas.has_fixed_bond_length() => canvas.bond_length,
            None => fitted_bond_length(&canvas, structures).unwrap_or(DEFAULT_BOND_LENGTH),
        };
        canvas.bond_length = bond_length;
        debug!(bond_length, "Resolved bond length.");

        let mut builder = RenderOptionsBuilder::new().bond_length(bond_length);
        if let Some(mode) = args.label_mode.or(render.label_mode) {
            builder = builder.label_mode(mode);
        }
        if let Some(mode) = args.hydro_mode.or(render.hydro_mode) {
            builder = builder.hydro_mode(mode);
        }
        if let Some(style) = args.stereo_style.or(render.stereo_style) {
            builder = builder.stereo_style(style);
        }
        if let Some(on) = flag(args.center_double_bond, true, render.center_double_bond) {
            builder = builder.center_double_bond_when_stereo_adjacent(on);
        }
        if let Some(on) = flag(args.atom_ids, true, render.show_atom_ids) {
            builder = builder.show_atom_ids(on);
        }
        if let Some(on) = flag(args.bond_ids, true, render.show_bond_ids) {
            builder = builder.show_bond_ids(on);
        }
        if let Some(on) = flag(args.no_coloring, false, render.atom_coloring) {
            builder = builder.atom_coloring(on);
        }
        if let Some(on) = flag(args.highlight_thickness, true, render.highlight_thickness) {
            builder = builder.highlight_thickness(on);
        }
        if let Some(factor) = args.thickness.or(render.relative_thickness) {
            builder = builder.relative_thickness(factor);
        }

        Ok(ResolvedConfig {
            options: builder.build()?,
            canvas,
        })
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };

            if let Some(field) = key.strip_prefix("render.") {
                let render = self.render.get_or_insert_with(Default::default);
                match field {
                    "label-mode" => render.label_mode = Some(parse_value(key, value)?),
                    "hydro-mode" => render.hydro_mode = Some(parse_value(key, value)?),
                    "stereo-style" => render.stereo_style = Some(parse_value(key, value)?),
                    "center-double-bond" => {
                        render.center_double_bond = Some(parse_value(key, value)?)
                    }
                    "show-atom-ids" => render.show_atom_ids = Some(parse_value(key, value)?),
                    "show-bond-ids" => render.show_bond_ids = Some(parse_value(key, value)?),
                    "atom-coloring" => render.atom_coloring = Some(parse_value(key, value)?),
                    "highlight-thickness" => {
                        render.highlight_thickness = Some(parse_value(key, value)?)
                    }
                    "relative-thickness" => {
                        render.relative_thickness = Some(parse_value(key, value)?)
                    }
                    "bond-length" => render.bond_length = Some(parse_value(key, value)?),
                    _ => return Err(unknown_key(key)),
                }
                continue;
            }

            let Some(field) = key.strip_prefix("canvas.") else {
                return Err(unknown_key(key));
            };
            let canvas = self.canvas.get_or_insert_with(Default::default);
            match field {
                "width" => canvas.width = parse_value(key, value)?,
                "height" => canvas.height = parse_value(key, value)?,
                "bond-length" => canvas.bond_length = parse_value(key, value)?,
                "margin-x" => canvas.margin_x = parse_value(key, value)?,
                "margin-y" => canvas.margin_y = parse_value(key, value)?,
                "grid-column-number" => canvas.grid_column_number = parse_value(key, value)?,
                "comment" => canvas.comment = value.to_string(),
                "comment-pos" => canvas.comment_pos = parse_value(key, value)?,
                "comment-align" => {
                    canvas.comment_align =
                        parse_alignment(value).map_err(|e| CliError::Config(e.to_string()))?
                }
                "title-align" => {
                    canvas.title_align =
                        parse_alignment(value).map_err(|e| CliError::Config(e.to_string()))?
                }
                "title-prop" => canvas.title_prop = value.to_string(),
                _ => return Err(unknown_key(key)),
            }
        }
        Ok(())
    }
}

/// A set flag forces `when_set`; otherwise the configured value, if any, applies.
fn flag(set: bool, when_set: bool, configured: Option<bool>) -> Option<bool> {
    if set { Some(when_set) } else { configured }
}

fn parse_value<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .parse()
        .map_err(|e| CliError::Config(format!("Invalid value for {}: {} ({})", key, value, e)))
}

fn unknown_key(key: &str) -> CliError {
    CliError::Config(format!("Unknown configuration key for --set: '{}'", key))
}

/// Largest bond length at which every structure fits the fixed page.
fn fitted_bond_length(canvas: &CanvasOptions, structures: &[Structure]) -> Option<f32> {
    structures
        .iter()
        .filter_map(Structure::normalized_extent)
        .filter_map(|extent| canvas.fit_bond_length(extent))
        .reduce(f32::min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use molrender::core::canvas::CommentPosition;
    use molrender::core::models::bond::BondOrder;
    use molrender::core::models::structure::{StructureAtom, StructureBond};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn prepare_args(extra: &[&str]) -> PrepareArgs {
        let mut argv = vec!["molrender", "prepare", "-i", "in.toml", "-o", "out_%s.json"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Prepare(args) => args,
            other => panic!("unexpected command {:?}", other),
        }
    }

    fn chain(length: usize) -> Structure {
        let mut s = Structure::new("chain");
        for k in 0..length {
            s.atoms.push(StructureAtom::new("C", k as f32, 0.0));
        }
        for k in 1..length {
            s.bonds.push(StructureBond::new(k - 1, k, BondOrder::Single));
        }
        s
    }

    #[test]
    fn file_values_fill_unset_options() {
        let file = write_config(
            r#"
            [render]
            label-mode = "forceshow"
            stereo-style = "ext"
            bond-length = 45.0
            show-atom-ids = true

            [canvas]
            comment-pos = "top"
            margin-x = 5
            "#,
        );
        let partial = PartialRenderConfig::from_file(file.path()).unwrap();
        let resolved = partial.merge_with_cli(&prepare_args(&[]), &[]).unwrap();
        assert_eq!(resolved.options.label_mode, LabelMode::ForceShow);
        assert_eq!(resolved.options.stereo_style, StereoStyle::Ext);
        assert_eq!(resolved.options.bond_length, 45.0);
        assert!(resolved.options.show_atom_ids);
        assert_eq!(resolved.options.hydro_mode, HydroMode::default());
        assert_eq!(resolved.canvas.comment_pos, CommentPosition::Top);
        assert_eq!(resolved.canvas.margin_x, 5);
        assert_eq!(resolved.canvas.bond_length, 45.0);
    }

    #[test]
    fn cli_flags_override_set_values_and_file() {
        let file = write_config(
            r#"
            [render]
            label-mode = "forceshow"
            atom-coloring = true
            relative-thickness = 2.0
            "#,
        );
        let partial = PartialRenderConfig::from_file(file.path()).unwrap();
        let args = prepare_args(&[
            "--label-mode",
            "forcehide",
            "--no-coloring",
            "-S",
            "render.relative-thickness=1.5",
            "render.hydro-mode=all",
        ]);
        let resolved = partial.merge_with_cli(&args, &[]).unwrap();
        assert_eq!(resolved.options.label_mode, LabelMode::ForceHide);
        assert!(!resolved.options.atom_coloring);
        assert_eq!(resolved.options.relative_thickness, 1.5);
        assert_eq!(resolved.options.hydro_mode, HydroMode::All);
        assert_eq!(resolved.options.bond_length, DEFAULT_BOND_LENGTH);
    }

    #[test]
    fn canvas_set_values_and_alignment_keywords() {
        let args = prepare_args(&[
            "-S",
            "canvas.comment-align=left",
            "canvas.title-prop=^ID",
            "--title-align",
            "right",
        ]);
        let resolved = PartialRenderConfig::default().merge_with_cli(&args, &[]).unwrap();
        assert_eq!(resolved.canvas.comment_align, 0.0);
        assert_eq!(resolved.canvas.title_align, 1.0);
        assert_eq!(resolved.canvas.title_prop, "^ID");
    }

    #[test]
    fn fixed_page_fits_the_widest_structure() {
        let args = prepare_args(&["-W", "220", "-H", "220"]);
        let structures = [chain(3), chain(5)];
        let resolved = PartialRenderConfig::default()
            .merge_with_cli(&args, &structures)
            .unwrap();
        let room = (220 - 2 * resolved.canvas.margin_x) as f32;
        assert!((resolved.options.bond_length - room / 4.0).abs() < 1e-4);
        assert_eq!(resolved.canvas.width, 220);
    }

    #[test]
    fn malformed_set_values_are_rejected() {
        for bad in ["render.bond-length", "render.bond-length=wide", "render.colour=1", "page.width=3"] {
            let args = prepare_args(&["-S", bad]);
            let result = PartialRenderConfig::default().merge_with_cli(&args, &[]);
            assert!(matches!(result, Err(CliError::Config(_))), "{bad}");
        }
    }

    #[test]
    fn non_positive_bond_length_is_a_config_error() {
        let args = prepare_args(&["--bond=0"]);
        let result = PartialRenderConfig::default().merge_with_cli(&args, &[]);
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn unknown_file_keys_fail_to_parse() {
        let file = write_config("[render]\nbond-size = 3\n");
        let result = PartialRenderConfig::from_file(file.path());
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }
}
