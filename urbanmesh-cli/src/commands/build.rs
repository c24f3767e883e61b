//! Build command: GeoJSON inputs to binary chunks plus index.

use std::path::PathBuf;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use urbanmesh::coord::Origin;
use urbanmesh::pipeline::{build_chunks, BuildSummary, PipelineConfig, ProgressObserver};

use super::common::load_config;
use crate::error::CliError;

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Directory containing buildings.geojson and roads.geojson
    #[arg(short, long, default_value = "output/osm")]
    pub input: PathBuf,

    /// Output directory for chunks and index.json
    #[arg(short, long, default_value = "output/chunks")]
    pub out: PathBuf,

    /// Projection origin latitude (overrides config)
    #[arg(long)]
    pub origin_lat: Option<f64>,

    /// Projection origin longitude (overrides config)
    #[arg(long)]
    pub origin_lon: Option<f64>,

    /// Chunk edge length in meters (overrides config)
    #[arg(long)]
    pub chunk_size: Option<f64>,
}

/// Progress bar wired to the pipeline's observer seam.
struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    fn new() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }
}

impl ProgressObserver for BarProgress {
    fn partitioned(&mut self, chunk_total: usize) {
        self.bar = ProgressBar::new(chunk_total as u64);
        self.bar.set_style(
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} chunks {msg}")
                .expect("static progress template"),
        );
    }

    fn chunk_written(&mut self, cx: i32, cy: i32, building_count: usize, road_count: usize) {
        self.bar
            .set_message(format!("({cx},{cy}): {building_count}b {road_count}r"));
        self.bar.inc(1);
    }
}

pub fn run(args: &BuildArgs, config_path: Option<&PathBuf>) -> Result<(), CliError> {
    let config = resolve_config(args, config_path)?;

    let mut progress = BarProgress::new();
    let summary = build_chunks(
        &args.input.join("buildings.geojson"),
        &args.input.join("roads.geojson"),
        &args.out,
        &config,
        &mut progress,
    )?;
    progress.bar.finish_and_clear();

    print_summary(&summary, &args.out);
    Ok(())
}

pub fn resolve_config(
    args: &BuildArgs,
    config_path: Option<&PathBuf>,
) -> Result<PipelineConfig, CliError> {
    let file = load_config(config_path)?;
    let origin = Origin::new(
        args.origin_lat.unwrap_or(file.origin.latitude),
        args.origin_lon.unwrap_or(file.origin.longitude),
    );
    Ok(PipelineConfig::new()
        .with_origin(origin)
        .with_chunk_size(args.chunk_size.unwrap_or(file.chunk_size)))
}

pub fn print_summary(summary: &BuildSummary, out: &std::path::Path) {
    println!(
        "{} {} chunks, {} buildings, {} road records -> {}",
        style("Done:").green().bold(),
        summary.chunk_count,
        summary.building_count,
        summary.road_count,
        out.display()
    );
}
