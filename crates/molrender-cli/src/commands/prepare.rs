use crate::cli::PrepareArgs;
use crate::config::PartialRenderConfig;
use crate::error::{CliError, Result};
use crate::utils::naming::{self, CommentSource};
use crate::utils::progress::CliProgressHandler;
use molrender::{
    core::canvas::CanvasOptions,
    core::io::{dump::RenderDump, format},
    engine::{metrics::MonospaceMetrics, progress::ProgressReporter},
    workflows::batch::{self, BatchItem},
};
use tracing::{info, warn};

pub fn run(args: PrepareArgs) -> Result<()> {
    let partial_config = match &args.config {
        Some(path) => PartialRenderConfig::from_file(path)?,
        None => PartialRenderConfig::default(),
    };

    info!("Loading input structures from {:?}", &args.input);
    let structures = match args.format {
        Some(fmt) => fmt.read_path(&args.input),
        None => format::read_structures(&args.input),
    }
    .map_err(|e| CliError::FileParsing {
        path: args.input.clone(),
        source: e.into(),
    })?;

    if structures.is_empty() {
        warn!("Input file contains no structures.");
        println!("Warning: no structures found in {}", args.input.display());
        return Ok(());
    }
    naming::validate_template(&args.output, structures.len())?;

    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args, &structures)?;
    let comments = CommentSource::from_args(&args);
    let metrics = MonospaceMetrics::default();

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Preparing {} structure(s) at bond length {:.1}px...",
        structures.len(),
        config.options.bond_length
    );
    let summary = batch::run(
        &structures,
        &config.options,
        &metrics,
        &reporter,
        |item: BatchItem<'_>| write_item(item, &args, &config.canvas, &comments),
    );

    for failure in &summary.failures {
        println!(
            "  Skipped #{} '{}': {}",
            failure.index,
            failure.name,
            failure.reason
        );
    }
    println!(
        "✓ {} of {} structure(s) written.",
        summary.succeeded,
        structures.len()
    );

    if summary.succeeded == 0 {
        return Err(CliError::Other(anyhow::anyhow!(
            "No structure could be prepared."
        )));
    }
    Ok(())
}

fn write_item(
    item: BatchItem<'_>,
    args: &PrepareArgs,
    canvas: &CanvasOptions,
    comments: &CommentSource,
) -> Result<()> {
    let id = naming::structure_id(item.structure, item.index, args.id_field.as_deref())?;
    let path = naming::output_path(&args.output, &id);
    let title = canvas.title_for(&item.structure.name, item.structure.properties_iter());

    RenderDump {
        name: &item.structure.name,
        title: &title,
        comment: comments.resolve(item.structure, &canvas.comment),
        grid_cell: canvas.grid_cell(item.index),
        settings: item.settings,
        canvas,
        molecule: item.data,
    }
    .write_to_path(&path)
    .map_err(|source| CliError::Output { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::io::Write;
    use std::path::Path;

    const INPUT: &str = r#"
[[structure]]
name = "methanol"
atoms = [
    { label = "C", pos = [0.0, 0.0] },
    { label = "O", pos = [1.0, 0.0] },
]
bonds = [{ begin = 0, end = 1 }]
properties = { ID = "M1", MW = "32.04" }

[[structure]]
name = "water"
atoms = [{ label = "O", pos = [0.0, 0.0] }]
"#;

    fn write_input(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("input.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(INPUT.as_bytes()).unwrap();
        path
    }

    fn args(argv: &[&str]) -> PrepareArgs {
        let mut full = vec!["molrender", "prepare"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Commands::Prepare(args) => args,
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn writes_one_dump_per_structure() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path());
        let output = dir.path().join("mol_%s.json");
        run(args(&[
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--comment-name",
        ]))
        .unwrap();

        let first = std::fs::read_to_string(dir.path().join("mol_0.json")).unwrap();
        let dump: serde_json::Value = serde_json::from_str(&first).unwrap();
        assert_eq!(dump["name"], "methanol");
        assert_eq!(dump["title"], "methanol");
        assert_eq!(dump["comment"], "methanol");
        assert_eq!(dump["canvas"]["bond-length"], 30.0);
        assert_eq!(dump["grid_cell"], serde_json::json!([0, 0]));
        let second = std::fs::read_to_string(dir.path().join("mol_1.json")).unwrap();
        let dump: serde_json::Value = serde_json::from_str(&second).unwrap();
        assert_eq!(dump["grid_cell"], serde_json::json!([1, 0]));
    }

    #[test]
    fn structures_without_the_id_property_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path());
        let output = dir.path().join("mol_%s.json");
        run(args(&[
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--id-field",
            "ID",
            "--comment-field",
            "MW",
        ]))
        .unwrap();

        let written = std::fs::read_to_string(dir.path().join("mol_M1.json")).unwrap();
        let dump: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(dump["comment"], "32.04");
        let files = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(files, 2);
    }

    #[test]
    fn several_structures_need_a_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path());
        let output = dir.path().join("mol.json");
        let result = run(args(&[
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ]));
        assert!(matches!(result, Err(CliError::Argument(_))));
    }

    #[test]
    fn unreadable_input_reports_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("missing.toml");
        let result = run(args(&["-i", input.to_str().unwrap(), "-o", "x_%s.json"]));
        assert!(matches!(result, Err(CliError::FileParsing { path, .. }) if path == input));
    }
}
