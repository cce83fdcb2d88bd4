use crate::cli::SettingsArgs;
use crate::error::{CliError, Result};
use molrender::core::settings::RenderSettings;
use molrender::engine::config::RenderOptionsBuilder;
use tracing::info;

pub fn run(args: SettingsArgs) -> Result<()> {
    let options = RenderOptionsBuilder::new()
        .bond_length(args.bond)
        .relative_thickness(args.thickness)
        .build()?;
    let settings = RenderSettings::new(options.scale_factor());
    info!(scale = settings.scale_factor, "Derived render settings.");

    let json = if args.compact {
        serde_json::to_string(&settings)
    } else {
        serde_json::to_string_pretty(&settings)
    }
    .map_err(|e| CliError::Other(e.into()))?;
    println!("{}", json);
    Ok(())
}
