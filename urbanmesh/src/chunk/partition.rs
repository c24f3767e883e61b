//! Assignment of features to grid cells.
//!
//! Buildings go to the single cell containing their vertex centroid; roads
//! go to every cell their polyline visits, carrying the full polyline each
//! time (clipping is deferred to the renderer). Cells are keyed in a
//! `BTreeMap` so iteration, and therefore every downstream artifact, is in
//! ascending `(cx, cy)` order.

use std::collections::{BTreeMap, HashSet};

use crate::coord::{self, Origin};
use crate::feature::{BuildingFeature, RoadFeature};

use super::grid::{ChunkBounds, ChunkGrid};

/// Features assigned to one cell, in input traversal order.
#[derive(Debug, Clone)]
pub struct ChunkData {
    pub bounds: ChunkBounds,
    pub buildings: Vec<BuildingFeature>,
    pub roads: Vec<RoadFeature>,
}

impl ChunkData {
    fn new(bounds: ChunkBounds) -> Self {
        Self {
            bounds,
            buildings: Vec::new(),
            roads: Vec::new(),
        }
    }
}

/// Arithmetic mean of the projected ring vertices.
///
/// Deliberately not area-weighted, and computed over the ring exactly as
/// given (a closing duplicate vertex participates in the mean). This
/// determines partition behavior and must stay stable.
pub fn projected_centroid(ring: &[(f64, f64)], origin: &Origin) -> (f64, f64) {
    let mut sum_x = 0.0;
    let mut sum_z = 0.0;
    for &(lon, lat) in ring {
        let (x, z) = coord::project(lon, lat, origin);
        sum_x += x;
        sum_z += z;
    }
    let n = ring.len() as f64;
    (sum_x / n, sum_z / n)
}

/// Partition features into grid cells.
///
/// Only cells that receive at least one feature are materialized.
pub fn partition_features(
    buildings: Vec<BuildingFeature>,
    roads: Vec<RoadFeature>,
    origin: &Origin,
    grid: &ChunkGrid,
) -> BTreeMap<(i32, i32), ChunkData> {
    let mut chunks: BTreeMap<(i32, i32), ChunkData> = BTreeMap::new();

    for building in buildings {
        if building.ring.is_empty() {
            continue;
        }
        let (cx, cz) = projected_centroid(&building.ring, origin);
        let cell = grid.cell_for_point(cx, cz);
        chunks
            .entry(cell)
            .or_insert_with(|| ChunkData::new(grid.bounds(cell.0, cell.1)))
            .buildings
            .push(building);
    }

    for road in roads {
        let mut visited: HashSet<(i32, i32)> = HashSet::new();
        for &(lon, lat) in &road.points {
            let (x, z) = coord::project(lon, lat, origin);
            let cell = grid.cell_for_point(x, z);
            if visited.insert(cell) {
                chunks
                    .entry(cell)
                    .or_insert_with(|| ChunkData::new(grid.bounds(cell.0, cell.1)))
                    .roads
                    .push(road.clone());
            }
        }
    }

    chunks
}
