use clap::{ArgGroup, Args, Parser, Subcommand};
use molrender::core::canvas::{CommentPosition, parse_alignment};
use molrender::core::io::format::StructureFormat;
use molrender::engine::config::{HydroMode, LabelMode, StereoStyle};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "molrender - prepares 2D chemical structure diagrams: bond geometry, rings, atom labels and brackets, dumped as a render model.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for batch preparation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Prepare the render model of every structure in an input file.
    Prepare(PrepareArgs),
    /// Print the dimensional constants derived for a bond length.
    Settings(SettingsArgs),
}

/// Arguments for the `prepare` subcommand.
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("comment_source").args(["comment", "comment_field", "comment_name"])))]
pub struct PrepareArgs {
    // --- Input / Output ---
    /// Path to the input structure file (.toml or .json).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Output path. With several structures it must contain `%s`, which is
    /// replaced by the structure number or the `--id-field` property.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: String,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Force the input format instead of guessing it from the extension.
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<StructureFormat>,

    /// Property used instead of the structure number to fill `%s`.
    #[arg(long, value_name = "NAME")]
    pub id_field: Option<String>,

    // --- Geometry ---
    /// Bond length in pixels.
    #[arg(long, value_name = "FLOAT", conflicts_with_all = ["width", "height"])]
    pub bond: Option<f32>,

    /// Page width in pixels; the bond length is fitted to the page.
    #[arg(short = 'W', long, value_name = "INT", requires = "height")]
    pub width: Option<i32>,

    /// Page height in pixels; the bond length is fitted to the page.
    #[arg(short = 'H', long, value_name = "INT", requires = "width")]
    pub height: Option<i32>,

    /// Scale factor applied to line widths.
    #[arg(long, value_name = "FLOAT")]
    pub thickness: Option<f32>,

    // --- Style ---
    /// Carbon label mode: normal, forceshow, hideterminal or forcehide.
    #[arg(long, value_name = "MODE")]
    pub label_mode: Option<LabelMode>,

    /// Implicit hydrogen mode: none, terminal, hetero, terminalhetero or all.
    #[arg(long, value_name = "MODE")]
    pub hydro_mode: Option<HydroMode>,

    /// Stereo style: old (wedges only) or ext (also labels stereo groups).
    #[arg(long, value_name = "STYLE")]
    pub stereo_style: Option<StereoStyle>,

    /// Center double bonds that touch a stereo bond.
    #[arg(long)]
    pub center_double_bond: bool,

    /// Draw atom indices.
    #[arg(long)]
    pub atom_ids: bool,

    /// Draw bond indices.
    #[arg(long)]
    pub bond_ids: bool,

    /// Draw every atom label in the base color.
    #[arg(long)]
    pub no_coloring: bool,

    /// Thicken highlighted bonds.
    #[arg(long)]
    pub highlight_thickness: bool,

    // --- Annotations ---
    /// Literal comment text.
    #[arg(long, value_name = "TEXT")]
    pub comment: Option<String>,

    /// Use a structure property as the comment.
    #[arg(long, value_name = "NAME")]
    pub comment_field: Option<String>,

    /// Use the structure name as the comment.
    #[arg(long)]
    pub comment_name: bool,

    /// Comment placement: top or bottom.
    #[arg(long, value_name = "POS")]
    pub comment_pos: Option<CommentPosition>,

    /// Comment alignment: left, center, right or a fraction in [0, 1].
    #[arg(long, value_name = "ALIGN", value_parser = parse_alignment)]
    pub comment_align: Option<f32>,

    /// Title template; `^KEY` expands to a property, `^NAME` to the structure name.
    #[arg(long, value_name = "TEMPLATE")]
    pub title: Option<String>,

    /// Title alignment: left, center, right or a fraction in [0, 1].
    #[arg(long, value_name = "ALIGN", value_parser = parse_alignment)]
    pub title_align: Option<f32>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S render.label-mode=forceshow
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `settings` subcommand.
#[derive(Args, Debug)]
pub struct SettingsArgs {
    /// Bond length in pixels.
    #[arg(long, value_name = "FLOAT", default_value_t = 30.0)]
    pub bond: f32,

    /// Scale factor applied to line widths.
    #[arg(long, value_name = "FLOAT", default_value_t = 1.0)]
    pub thickness: f32,

    /// Print the JSON on a single line.
    #[arg(long)]
    pub compact: bool,
}
