//! Road ribbon meshes.
//!
//! A road centerline becomes a flat strip of constant width: one
//! left/right vertex pair per usable polyline vertex, quads between
//! consecutive pairs. Tangents at interior vertices average the incoming
//! and outgoing directions, which approximates a miter joint without
//! miter-length correction. The strip floats slightly above the ground
//! plane so it never z-fights with it.

use crate::coord::{self, Origin};
use crate::mesh::{Mesh, Vertex};

/// Height of the ribbon above the ground plane, meters.
const ROAD_ELEVATION: f32 = 0.05;

/// Tangents shorter than this (meters) mark coincident vertices; the
/// vertex is skipped entirely.
const MIN_TANGENT: f64 = 0.001;

/// Length texture scale: one UV unit per 10 m along the road.
const LENGTH_UV_METERS: f64 = 10.0;

/// Builds ribbon meshes for road centerlines.
#[derive(Debug, Clone)]
pub struct RoadMeshGenerator {
    origin: Origin,
}

impl RoadMeshGenerator {
    pub fn new(origin: Origin) -> Self {
        Self { origin }
    }

    /// Ribbonize a polyline (geographic coordinates) to the given total
    /// width in meters.
    ///
    /// Returns an empty mesh for fewer than two vertices or when every
    /// tangent is degenerate.
    pub fn generate(&self, points: &[(f64, f64)], width: f64) -> Mesh {
        let local = coord::project_all(points, &self.origin);
        if local.len() < 2 {
            return Mesh::new();
        }

        let mut mesh = Mesh::new();
        let half_width = width / 2.0;
        let mut accumulated = 0.0f64;
        let mut emitted_pairs = 0u32;
        let n = local.len();

        for i in 0..n {
            let (x, z) = local[i];

            // Length along the centerline is measured between consecutive
            // input vertices, so skipped vertices still advance it.
            if i > 0 {
                let (px, pz) = local[i - 1];
                let sx = x - px;
                let sz = z - pz;
                accumulated += (sx * sx + sz * sz).sqrt();
            }

            let (mut dx, mut dz) = if i == 0 {
                (local[1].0 - x, local[1].1 - z)
            } else if i == n - 1 {
                (x - local[i - 1].0, z - local[i - 1].1)
            } else {
                (local[i + 1].0 - local[i - 1].0, local[i + 1].1 - local[i - 1].1)
            };

            let length = (dx * dx + dz * dz).sqrt();
            if length < MIN_TANGENT {
                continue;
            }
            dx /= length;
            dz /= length;

            // Left-perpendicular of the tangent.
            let px = -dz;
            let pz = dx;

            let v = (accumulated / LENGTH_UV_METERS) as f32;
            mesh.vertices.push(Vertex::new(
                [
                    (x + px * half_width) as f32,
                    ROAD_ELEVATION,
                    (z + pz * half_width) as f32,
                ],
                [0.0, 1.0, 0.0],
                [0.0, v],
            ));
            mesh.vertices.push(Vertex::new(
                [
                    (x - px * half_width) as f32,
                    ROAD_ELEVATION,
                    (z - pz * half_width) as f32,
                ],
                [0.0, 1.0, 0.0],
                [1.0, v],
            ));

            if emitted_pairs > 0 {
                let base = 2 * (emitted_pairs - 1);
                mesh.indices
                    .extend([base, base + 1, base + 2, base + 1, base + 3, base + 2]);
            }
            emitted_pairs += 1;
        }

        mesh
    }
}
