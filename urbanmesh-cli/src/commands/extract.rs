//! Extract command: fetch OSM data and write GeoJSON.

use std::path::PathBuf;

use clap::Args;
use console::style;
use urbanmesh::osm::{save_geojson, OsmExtractor, DEFAULT_TIMEOUT_SECS};

use super::common::{load_config, parse_bbox};
use crate::error::CliError;

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Bounding box as south,west,north,east (overrides config)
    #[arg(long)]
    pub bbox: Option<String>,

    /// Output directory for GeoJSON files
    #[arg(short, long, default_value = "output/osm")]
    pub out: PathBuf,

    /// Overpass request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,
}

pub fn run(args: &ExtractArgs, config_path: Option<&PathBuf>) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let bbox = match &args.bbox {
        Some(raw) => parse_bbox(raw)?,
        None => config.bbox,
    };

    println!(
        "Extracting OSM data for {}",
        style(bbox.overpass_string()).cyan()
    );

    let extractor = OsmExtractor::new(bbox, args.timeout)?;
    let data = extractor.extract()?;
    save_geojson(&data, &args.out)?;

    println!(
        "{} {} buildings, {} roads -> {}",
        style("Done:").green().bold(),
        data.buildings.len(),
        data.roads.len(),
        args.out.display()
    );
    Ok(())
}
