//! Index manifest for a chunk directory.
//!
//! `index.json` is the entry point the renderer loads first: it records the
//! projection origin, the grid cell size and one entry per written chunk
//! file. Entries are appended in the order chunks are written, which the
//! pipeline keeps in ascending `(cx, cy)` order.

use serde::Serialize;

use crate::coord::Origin;

use super::grid::ChunkBounds;

/// Manifest schema version.
pub const INDEX_VERSION: &str = "1.0";

/// The manifest document.
#[derive(Debug, Clone, Serialize)]
pub struct ChunkIndex {
    pub version: String,
    pub origin: Origin,
    pub chunk_size_meters: f64,
    pub chunks: Vec<ChunkEntry>,
}

/// One written chunk file.
#[derive(Debug, Clone, Serialize)]
pub struct ChunkEntry {
    pub id: String,
    pub file: String,
    pub x: i32,
    pub y: i32,
    pub bounds: BoundsEntry,
    pub building_count: usize,
    pub road_count: usize,
}

/// Metric bounds as serialized in the manifest.
#[derive(Debug, Clone, Serialize)]
pub struct BoundsEntry {
    pub min_x: f64,
    pub min_z: f64,
    pub max_x: f64,
    pub max_z: f64,
}

impl ChunkIndex {
    pub fn new(origin: Origin, chunk_size_meters: f64) -> Self {
        Self {
            version: INDEX_VERSION.to_string(),
            origin,
            chunk_size_meters,
            chunks: Vec::new(),
        }
    }

    /// Record a written chunk.
    pub fn push_entry(&mut self, bounds: &ChunkBounds, building_count: usize, road_count: usize) {
        self.chunks.push(ChunkEntry {
            id: format!("{}_{}", bounds.x, bounds.y),
            file: format!("chunks/chunk_{}_{}.bin", bounds.x, bounds.y),
            x: bounds.x,
            y: bounds.y,
            bounds: BoundsEntry {
                min_x: bounds.min_x,
                min_z: bounds.min_z,
                max_x: bounds.max_x,
                max_z: bounds.max_z,
            },
            building_count,
            road_count,
        });
    }

    /// Pretty-printed JSON bytes of the manifest.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }
}
