use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use kfs_grid::{build_grid, export_csv, export_json, GridOptions};
use kfs_parse::parse_file;
use serde_json::json;
use tracing::info;

use super::load_config;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
    Both,
}

#[derive(Args, Debug)]
pub struct GridArgs {
    /// Fitter log to scan.
    #[arg(long)]
    pub log: PathBuf,
    /// Output directory for the rendered sheet.
    #[arg(long)]
    pub out: PathBuf,
    /// Optional YAML report configuration.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Surfaces kept per track; overrides the configuration.
    #[arg(long = "max-surfaces")]
    pub max_surfaces: Option<usize>,
    /// Which artefacts to write.
    #[arg(long, value_enum, default_value_t = OutputFormat::Both)]
    pub format: OutputFormat,
}

pub fn run(args: &GridArgs) -> Result<(), Box<dyn Error>> {
    let config = load_config(args.config.as_deref())?;
    let mut opts = GridOptions::from(&config);
    if let Some(max) = args.max_surfaces {
        opts = opts.with_max_surfaces(max);
    }

    let records = parse_file(&args.log, &config.sentinel)?;
    let grid = build_grid(&records, &opts)?;

    fs::create_dir_all(&args.out)?;
    let mut outputs = Vec::new();
    if matches!(args.format, OutputFormat::Csv | OutputFormat::Both) {
        let path = args.out.join(format!("{}.csv", grid.sheet));
        export_csv(&grid, &path)?;
        outputs.push(path.display().to_string());
    }
    if matches!(args.format, OutputFormat::Json | OutputFormat::Both) {
        let path = args.out.join(format!("{}.json", grid.sheet));
        export_json(&grid, &path)?;
        outputs.push(path.display().to_string());
    }

    let digest = grid.digest()?;
    info!(sheet = %grid.sheet, cells = grid.cells.len(), %digest, "grid written");
    let summary = json!({
        "sheet": grid.sheet,
        "digest": digest,
        "tracks": grid.summary.tracks,
        "surfaces": grid.summary.surfaces,
        "step_rows": grid.summary.step_rows,
        "dropped_surfaces": grid.summary.dropped_surfaces(),
        "truncated": grid.summary.truncated,
        "outputs": outputs,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
