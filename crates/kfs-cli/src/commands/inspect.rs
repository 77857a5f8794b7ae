use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use kfs_core::to_canonical_json_bytes;
use kfs_parse::parse_file;

use super::load_config;

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Fitter log to scan.
    #[arg(long)]
    pub log: PathBuf,
    /// Optional YAML report configuration (only the sentinel is used).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: &InspectArgs) -> Result<(), Box<dyn Error>> {
    let config = load_config(args.config.as_deref())?;
    let records = parse_file(&args.log, &config.sentinel)?;
    let bytes = to_canonical_json_bytes(&records)?;
    println!("{}", String::from_utf8(bytes)?);
    Ok(())
}
