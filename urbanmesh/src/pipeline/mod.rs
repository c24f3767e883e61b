//! End-to-end chunk building.
//!
//! Loads the two GeoJSON inputs, partitions features into grid cells,
//! generates meshes per cell, serializes every non-empty cell and writes
//! the index manifest. The run is single-threaded and deterministic: cells
//! are processed in ascending `(cx, cy)` order, features within a cell in
//! input order.

mod config;

pub use config::{ConfigError, PipelineConfig, DEFAULT_CHUNK_SIZE_METERS};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::chunk::{self, ChunkGrid, ChunkIndex, MeshedChunk};
use crate::feature::{self, InputError};
use crate::mesh::{BuildingMeshGenerator, RoadMeshGenerator};

/// Errors that abort a pipeline run.
///
/// Per-feature problems never show up here; they are logged and skipped at
/// the input boundary or at mesh generation.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write chunk file {path}: {source}")]
    ChunkWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize index manifest: {0}")]
    IndexSerialize(#[source] serde_json::Error),

    #[error("failed to write index manifest {path}: {source}")]
    IndexWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Hook for user-facing progress display.
///
/// The pipeline reports through this seam so the CLI can drive a progress
/// bar without the core depending on any terminal crate.
pub trait ProgressObserver {
    /// Partitioning finished; `chunk_total` cells will be processed.
    fn partitioned(&mut self, chunk_total: usize) {
        let _ = chunk_total;
    }

    /// One chunk file was written.
    fn chunk_written(&mut self, cx: i32, cy: i32, building_count: usize, road_count: usize) {
        let _ = (cx, cy, building_count, road_count);
    }
}

/// Observer that ignores everything.
pub struct NoopProgress;

impl ProgressObserver for NoopProgress {}

/// Totals for a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// Chunk files written.
    pub chunk_count: usize,
    /// Building records serialized (each building appears once).
    pub building_count: usize,
    /// Road records serialized (a road spanning several chunks counts once
    /// per chunk).
    pub road_count: usize,
}

/// Run the full build: GeoJSON inputs to chunk directory plus index.
///
/// A missing input file is treated as an empty collection so building-only
/// or road-only datasets work. Output lands in `<out_dir>/chunks/` and
/// `<out_dir>/index.json`; rerunning overwrites previous output.
pub fn build_chunks(
    buildings_path: &Path,
    roads_path: &Path,
    out_dir: &Path,
    config: &PipelineConfig,
    progress: &mut dyn ProgressObserver,
) -> Result<BuildSummary, PipelineError> {
    config.validate()?;

    let buildings = if buildings_path.exists() {
        feature::load_buildings(buildings_path)?
    } else {
        info!("no buildings file at {}", buildings_path.display());
        Vec::new()
    };
    let roads = if roads_path.exists() {
        feature::load_roads(roads_path)?
    } else {
        info!("no roads file at {}", roads_path.display());
        Vec::new()
    };
    info!(
        "loaded {} buildings and {} roads",
        buildings.len(),
        roads.len()
    );

    let grid = ChunkGrid::new(config.chunk_size);
    let chunks = chunk::partition_features(buildings, roads, &config.origin, &grid);
    info!("partitioned into {} chunks", chunks.len());
    progress.partitioned(chunks.len());

    let chunks_dir = out_dir.join("chunks");
    fs::create_dir_all(&chunks_dir).map_err(|source| PipelineError::CreateDir {
        path: chunks_dir.clone(),
        source,
    })?;

    let building_gen = BuildingMeshGenerator::new(config.origin);
    let road_gen = RoadMeshGenerator::new(config.origin);

    let mut index = ChunkIndex::new(config.origin, config.chunk_size);
    let mut summary = BuildSummary::default();

    for ((cx, cy), data) in chunks {
        let mut meshed = MeshedChunk {
            bounds: data.bounds,
            buildings: Vec::with_capacity(data.buildings.len()),
            roads: Vec::with_capacity(data.roads.len()),
        };

        for building in data.buildings {
            let mesh = building_gen.generate(&building.ring, building.height);
            if mesh.is_empty() {
                warn!("building {:?} produced an empty mesh, skipping", building.id);
                continue;
            }
            meshed.buildings.push((building, mesh));
        }
        for road in data.roads {
            let mesh = road_gen.generate(&road.points, road.width);
            if mesh.is_empty() {
                warn!("road {:?} produced an empty mesh, skipping", road.id);
                continue;
            }
            meshed.roads.push((road, mesh));
        }

        if meshed.is_empty() {
            debug!("chunk ({cx}, {cy}) has no serializable features, skipping");
            continue;
        }

        let path = chunks_dir.join(format!("chunk_{cx}_{cy}.bin"));
        chunk::write_chunk(&path, &meshed, &config.origin).map_err(|source| {
            PipelineError::ChunkWrite {
                path: path.clone(),
                source,
            }
        })?;
        debug!(
            "wrote chunk ({cx}, {cy}): {} buildings, {} roads",
            meshed.buildings.len(),
            meshed.roads.len()
        );

        index.push_entry(&meshed.bounds, meshed.buildings.len(), meshed.roads.len());
        progress.chunk_written(cx, cy, meshed.buildings.len(), meshed.roads.len());

        summary.chunk_count += 1;
        summary.building_count += meshed.buildings.len();
        summary.road_count += meshed.roads.len();
    }

    let index_path = out_dir.join("index.json");
    let bytes = index
        .to_json_bytes()
        .map_err(PipelineError::IndexSerialize)?;
    fs::write(&index_path, bytes).map_err(|source| PipelineError::IndexWrite {
        path: index_path,
        source,
    })?;

    info!(
        "build complete: {} chunks, {} buildings, {} road records",
        summary.chunk_count, summary.building_count, summary.road_count
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_inputs(dir: &Path, buildings: &str, roads: &str) -> (PathBuf, PathBuf) {
        let buildings_path = dir.join("buildings.geojson");
        let roads_path = dir.join("roads.geojson");
        fs::write(&buildings_path, buildings).unwrap();
        fs::write(&roads_path, roads).unwrap();
        (buildings_path, roads_path)
    }

    const EMPTY: &str = r#"{"type": "FeatureCollection", "features": []}"#;

    #[test]
    fn test_invalid_config_refuses_to_start() {
        let dir = TempDir::new().unwrap();
        let config = PipelineConfig::new().with_chunk_size(-1.0);
        let result = build_chunks(
            &dir.path().join("buildings.geojson"),
            &dir.path().join("roads.geojson"),
            dir.path(),
            &config,
            &mut NoopProgress,
        );
        assert!(matches!(result, Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_missing_inputs_produce_empty_index() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let summary = build_chunks(
            &dir.path().join("buildings.geojson"),
            &dir.path().join("roads.geojson"),
            &out,
            &PipelineConfig::default(),
            &mut NoopProgress,
        )
        .unwrap();

        assert_eq!(summary, BuildSummary::default());
        assert!(out.join("index.json").exists());
        assert!(out.join("chunks").is_dir());
    }

    #[test]
    fn test_empty_collections_produce_no_chunks() {
        let dir = TempDir::new().unwrap();
        let (buildings, roads) = write_inputs(dir.path(), EMPTY, EMPTY);
        let out = dir.path().join("out");
        let summary = build_chunks(
            &buildings,
            &roads,
            &out,
            &PipelineConfig::default(),
            &mut NoopProgress,
        )
        .unwrap();

        assert_eq!(summary.chunk_count, 0);
        let index: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join("index.json")).unwrap()).unwrap();
        assert_eq!(index["chunks"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_progress_observer_sees_written_chunks() {
        struct Recorder(Vec<(i32, i32)>, usize);
        impl ProgressObserver for Recorder {
            fn partitioned(&mut self, chunk_total: usize) {
                self.1 = chunk_total;
            }
            fn chunk_written(&mut self, cx: i32, cy: i32, _b: usize, _r: usize) {
                self.0.push((cx, cy));
            }
        }

        let buildings = r#"{"type": "FeatureCollection", "features": [{
            "type": "Feature",
            "properties": {"height": 10.0},
            "geometry": {"type": "Polygon", "coordinates": [[
                [126.6151, 37.3551], [126.6153, 37.3551], [126.6153, 37.3553], [126.6151, 37.3553]
            ]]}
        }]}"#;

        let dir = TempDir::new().unwrap();
        let (buildings, roads) = write_inputs(dir.path(), buildings, EMPTY);
        let out = dir.path().join("out");
        let mut recorder = Recorder(Vec::new(), 0);
        let summary = build_chunks(
            &buildings,
            &roads,
            &out,
            &PipelineConfig::default(),
            &mut recorder,
        )
        .unwrap();

        assert_eq!(summary.chunk_count, 1);
        assert_eq!(recorder.1, 1);
        assert_eq!(recorder.0, vec![(0, 0)]);
    }
}
