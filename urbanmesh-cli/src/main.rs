//! UrbanMesh command-line interface.
//!
//! Thin glue over the library: argument parsing, log setup and progress
//! display. All pipeline behavior lives in the `urbanmesh` crate.

mod commands;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::build::BuildArgs;
use commands::extract::ExtractArgs;
use commands::run::RunArgs;

#[derive(Parser, Debug)]
#[command(
    name = "urbanmesh",
    version = urbanmesh::VERSION,
    about = "Convert OpenStreetMap city data into streamable binary 3D map chunks",
    propagate_version = true
)]
struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config.ini (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch OSM building and road data, write GeoJSON
    Extract(ExtractArgs),

    /// Convert GeoJSON into binary chunks and an index manifest
    Build(BuildArgs),

    /// Extract then build in one step
    Run(RunArgs),
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("urbanmesh={default_level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Commands::Extract(args) => commands::extract::run(args, cli.config.as_ref()),
        Commands::Build(args) => commands::build::run(args, cli.config.as_ref()),
        Commands::Run(args) => commands::run::run(args, cli.config.as_ref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
