//! Run command: extract then build in one invocation.

use std::path::PathBuf;

use clap::Args;
use console::style;
use urbanmesh::osm::{save_geojson, OsmExtractor, DEFAULT_TIMEOUT_SECS};
use urbanmesh::pipeline::{build_chunks, PipelineConfig, NoopProgress};

use super::common::{load_config, parse_bbox};
use crate::error::CliError;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Base output directory; GeoJSON lands in <out>/osm, chunks in
    /// <out>/chunks
    #[arg(short, long, default_value = "output")]
    pub out: PathBuf,

    /// Bounding box as south,west,north,east (overrides config)
    #[arg(long)]
    pub bbox: Option<String>,

    /// Chunk edge length in meters (overrides config)
    #[arg(long)]
    pub chunk_size: Option<f64>,

    /// Skip extraction and reuse GeoJSON already in <out>/osm
    #[arg(long)]
    pub skip_extract: bool,

    /// Overpass request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,
}

pub fn run(args: &RunArgs, config_path: Option<&PathBuf>) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let bbox = match &args.bbox {
        Some(raw) => parse_bbox(raw)?,
        None => config.bbox,
    };
    let osm_dir = args.out.join("osm");
    let chunks_dir = args.out.join("chunks");

    if args.skip_extract {
        println!("Skipping extraction, using {}", osm_dir.display());
    } else {
        println!(
            "[1/2] Extracting OSM data for {}",
            style(bbox.overpass_string()).cyan()
        );
        let extractor = OsmExtractor::new(bbox, args.timeout)?;
        let data = extractor.extract()?;
        save_geojson(&data, &osm_dir)?;
    }

    println!("[2/2] Building chunks");
    // The local frame is anchored at the region's south-west corner so all
    // chunk coordinates for the region are non-negative.
    let pipeline_config = PipelineConfig::new()
        .with_origin(bbox.origin())
        .with_chunk_size(args.chunk_size.unwrap_or(config.chunk_size));
    let summary = build_chunks(
        &osm_dir.join("buildings.geojson"),
        &osm_dir.join("roads.geojson"),
        &chunks_dir,
        &pipeline_config,
        &mut NoopProgress,
    )?;

    super::build::print_summary(&summary, &chunks_dir);
    Ok(())
}
