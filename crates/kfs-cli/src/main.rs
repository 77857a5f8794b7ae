use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    grid::{self, GridArgs},
    inspect::{self, InspectArgs},
};

mod commands;
mod telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "kfs-report",
    about = "Kalman fitter step logs to merged report grids"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a fitter log and write the merged step/surface grid.
    Grid(GridArgs),
    /// Parse a fitter log and print the extracted record stores as JSON.
    Inspect(InspectArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    telemetry::init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Grid(args) => grid::run(&args),
        Command::Inspect(args) => inspect::run(&args),
    }
}
