//! Prismatic building meshes extruded from 2D footprints.
//!
//! A footprint ring becomes three vertex groups: a floor ring at `y = 0`
//! facing down, a roof ring at the extrusion height facing up, and one
//! independent quad per wall so each wall keeps its own flat normal and its
//! own texture tiling.

use crate::coord::{self, Origin};
use crate::mesh::{triangulate, Mesh, Vertex};

/// Walls shorter than this (meters) are dropped; they contribute nothing
/// visible and would produce unstable normals.
const MIN_WALL_LENGTH: f64 = 0.01;

/// Horizontal texture scale: one UV unit per 10 m of footprint.
const GROUND_UV_METERS: f64 = 10.0;

/// Wall texture scale: one UV unit per 3 m, sized for window patterns.
const WALL_UV_METERS: f64 = 3.0;

/// Builds prism meshes for building footprints.
#[derive(Debug, Clone)]
pub struct BuildingMeshGenerator {
    origin: Origin,
}

impl BuildingMeshGenerator {
    pub fn new(origin: Origin) -> Self {
        Self { origin }
    }

    /// Extrude a footprint ring (geographic coordinates, closed or open)
    /// to the given height in meters.
    ///
    /// Returns an empty mesh when fewer than three vertices remain after
    /// dropping the closing duplicate.
    pub fn generate(&self, ring: &[(f64, f64)], height: f64) -> Mesh {
        let mut local = coord::project_all(ring, &self.origin);
        if local.len() > 1 && local.first() == local.last() {
            local.pop();
        }
        if local.len() < 3 {
            return Mesh::new();
        }

        let mut mesh = Mesh::new();
        let footprint = triangulate::triangulate(&local);

        // Floor ring at y = 0, facing down. The triangulation indices are
        // used in emitted order.
        let floor_start = mesh.vertices.len() as u32;
        for &(x, z) in &local {
            mesh.vertices.push(Vertex::new(
                [x as f32, 0.0, z as f32],
                [0.0, -1.0, 0.0],
                [(x / GROUND_UV_METERS) as f32, (z / GROUND_UV_METERS) as f32],
            ));
        }
        for &idx in &footprint {
            mesh.indices.push(floor_start + idx);
        }

        // Roof ring at y = height, facing up; same triangulation with the
        // second and third corner of every triangle swapped to flip the
        // winding.
        let roof_start = mesh.vertices.len() as u32;
        for &(x, z) in &local {
            mesh.vertices.push(Vertex::new(
                [x as f32, height as f32, z as f32],
                [0.0, 1.0, 0.0],
                [(x / GROUND_UV_METERS) as f32, (z / GROUND_UV_METERS) as f32],
            ));
        }
        for tri in footprint.chunks(3) {
            mesh.indices.push(roof_start + tri[0]);
            mesh.indices.push(roof_start + tri[2]);
            mesh.indices.push(roof_start + tri[1]);
        }

        // One quad per footprint edge.
        let n = local.len();
        for i in 0..n {
            let j = (i + 1) % n;
            let (x0, z0) = local[i];
            let (x1, z1) = local[j];

            let dx = x1 - x0;
            let dz = z1 - z0;
            let length = (dx * dx + dz * dz).sqrt();
            if length < MIN_WALL_LENGTH {
                continue;
            }

            // Outward normal, right-handed with y up.
            let nx = (dz / length) as f32;
            let nz = (-dx / length) as f32;
            let normal = [nx, 0.0, nz];

            let u1 = (length / WALL_UV_METERS) as f32;
            let v1 = (height / WALL_UV_METERS) as f32;

            let base = mesh.vertices.len() as u32;
            let h = height as f32;
            mesh.vertices.push(Vertex::new(
                [x0 as f32, 0.0, z0 as f32],
                normal,
                [0.0, 0.0],
            ));
            mesh.vertices.push(Vertex::new(
                [x1 as f32, 0.0, z1 as f32],
                normal,
                [u1, 0.0],
            ));
            mesh.vertices
                .push(Vertex::new([x1 as f32, h, z1 as f32], normal, [u1, v1]));
            mesh.vertices
                .push(Vertex::new([x0 as f32, h, z0 as f32], normal, [0.0, v1]));

            mesh.indices
                .extend([base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        mesh
    }
}
