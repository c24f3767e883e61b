//! Origin-anchored square grid used for spatial partitioning.

/// Metric bounds of one grid cell.
///
/// Lower bounds are inclusive, upper bounds exclusive, so every point in
/// the plane belongs to exactly one cell. Cell indices may be negative for
/// features west or south of the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkBounds {
    pub x: i32,
    pub y: i32,
    pub min_x: f64,
    pub min_z: f64,
    pub max_x: f64,
    pub max_z: f64,
}

impl ChunkBounds {
    pub fn contains_point(&self, x: f64, z: f64) -> bool {
        self.min_x <= x && x < self.max_x && self.min_z <= z && z < self.max_z
    }
}

/// The partitioning grid: square cells of a fixed edge length anchored at
/// the local origin.
#[derive(Debug, Clone, Copy)]
pub struct ChunkGrid {
    size: f64,
}

impl ChunkGrid {
    /// Create a grid with the given cell edge length in meters. The size
    /// must already be validated as positive.
    pub fn new(size: f64) -> Self {
        Self { size }
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    /// The cell containing a local point.
    pub fn cell_for_point(&self, x: f64, z: f64) -> (i32, i32) {
        (
            (x / self.size).floor() as i32,
            (z / self.size).floor() as i32,
        )
    }

    /// Metric bounds of a cell.
    pub fn bounds(&self, cx: i32, cy: i32) -> ChunkBounds {
        let min_x = cx as f64 * self.size;
        let min_z = cy as f64 * self.size;
        ChunkBounds {
            x: cx,
            y: cy,
            min_x,
            min_z,
            max_x: min_x + self.size,
            max_z: min_z + self.size,
        }
    }
}
