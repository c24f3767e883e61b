//! UrbanMesh - OpenStreetMap city data to streamable 3D map chunks.
//!
//! This library converts building footprints and road centerlines for a
//! bounded urban region into a spatially partitioned binary mesh dataset
//! that a 3D renderer streams at runtime. The pipeline has two halves:
//!
//! - [`osm`] fetches raw data from the Overpass API and writes GeoJSON
//!   with all attribute defaults resolved.
//! - [`pipeline`] reads that GeoJSON, projects it onto a local metric
//!   plane ([`coord`]), builds per-feature triangle meshes ([`mesh`]) and
//!   partitions them into fixed-size tiles serialized as binary chunk
//!   files with a JSON index ([`chunk`]).
//!
//! Given identical inputs and configuration, every output byte is
//! identical across runs.

pub mod chunk;
pub mod config;
pub mod coord;
pub mod feature;
pub mod mesh;
pub mod osm;
pub mod pipeline;

/// Crate version, surfaced by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
