//! Binary chunk serialization.
//!
//! One file per chunk, little-endian throughout:
//!
//! ```text
//! 0   magic "SDC1"            4   version u32
//! 8   cx i32                  12  cy i32
//! 16  building_count u32      20  road_count u32
//! 24  building_section u64    32  road_section u64   (patched after write)
//! 40  reserved, zero to 64
//! 64  building records, then road records
//! ```
//!
//! Each building record is a 48-byte instance block followed by its mesh;
//! each road record is a 16-byte attribute block followed by its mesh. The
//! road attribute block packs `width` at offset 2 with no alignment
//! padding, so every field is written explicitly.

use std::fs::File;
use std::io::{self, BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use crate::coord::Origin;
use crate::feature::{road_type_code, BuildingFeature, RoadFeature};
use crate::mesh::{Mesh, Vertex};

use super::grid::ChunkBounds;
use super::partition::projected_centroid;

/// File magic, "SDC1".
pub const MAGIC: [u8; 4] = *b"SDC1";

/// Container format version.
pub const FORMAT_VERSION: u32 = 1;

/// Fixed header size in bytes.
pub const HEADER_SIZE: u64 = 64;

/// Size of the per-building instance block.
pub const INSTANCE_BLOCK_SIZE: usize = 48;

/// Size of the per-road attribute block.
pub const ROAD_BLOCK_SIZE: usize = 16;

const BUILDING_OFFSET_POS: u64 = 24;
const ROAD_OFFSET_POS: u64 = 32;

/// A chunk ready for serialization: every feature paired with its
/// non-empty mesh, in partition order.
#[derive(Debug, Clone)]
pub struct MeshedChunk {
    pub bounds: ChunkBounds,
    pub buildings: Vec<(BuildingFeature, Mesh)>,
    pub roads: Vec<(RoadFeature, Mesh)>,
}

impl MeshedChunk {
    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty() && self.roads.is_empty()
    }
}

/// Write one chunk file.
///
/// The header is written first with zeroed section offsets; once the
/// section start positions are known the two offset fields are patched in
/// place. The file handle is released on every exit path.
pub fn write_chunk(path: &Path, chunk: &MeshedChunk, origin: &Origin) -> io::Result<()> {
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);

    let mut header = [0u8; HEADER_SIZE as usize];
    header[0..4].copy_from_slice(&MAGIC);
    header[4..8].copy_from_slice(&FORMAT_VERSION.to_le_bytes());
    header[8..12].copy_from_slice(&chunk.bounds.x.to_le_bytes());
    header[12..16].copy_from_slice(&chunk.bounds.y.to_le_bytes());
    header[16..20].copy_from_slice(&(chunk.buildings.len() as u32).to_le_bytes());
    header[20..24].copy_from_slice(&(chunk.roads.len() as u32).to_le_bytes());
    w.write_all(&header)?;

    let building_section = w.stream_position()?;
    for (building, mesh) in &chunk.buildings {
        write_building_record(&mut w, building, mesh, origin)?;
    }

    let road_section = w.stream_position()?;
    for (road, mesh) in &chunk.roads {
        write_road_record(&mut w, road, mesh)?;
    }

    w.seek(SeekFrom::Start(BUILDING_OFFSET_POS))?;
    w.write_all(&building_section.to_le_bytes())?;
    w.seek(SeekFrom::Start(ROAD_OFFSET_POS))?;
    w.write_all(&road_section.to_le_bytes())?;
    w.flush()
}

fn write_building_record<W: Write>(
    w: &mut W,
    building: &BuildingFeature,
    mesh: &Mesh,
    origin: &Origin,
) -> io::Result<()> {
    let (center_x, center_z) = projected_centroid(&building.ring, origin);

    let mut block = [0u8; INSTANCE_BLOCK_SIZE];
    block[0..4].copy_from_slice(&(center_x as f32).to_le_bytes());
    block[4..8].copy_from_slice(&0.0f32.to_le_bytes());
    block[8..12].copy_from_slice(&(center_z as f32).to_le_bytes());
    // rotation
    block[12..16].copy_from_slice(&0.0f32.to_le_bytes());
    // scale
    block[16..20].copy_from_slice(&1.0f32.to_le_bytes());
    block[20..24].copy_from_slice(&1.0f32.to_le_bytes());
    block[24..28].copy_from_slice(&1.0f32.to_le_bytes());
    block[28..32].copy_from_slice(&(building.height as f32).to_le_bytes());
    // texture_id and flags stay zero
    block[36..40].copy_from_slice(&0xFFFF_FFFFu32.to_le_bytes());
    // 8 reserved bytes stay zero
    w.write_all(&block)?;

    write_mesh(w, mesh)
}

fn write_road_record<W: Write>(w: &mut W, road: &RoadFeature, mesh: &Mesh) -> io::Result<()> {
    let mut block = [0u8; ROAD_BLOCK_SIZE];
    block[0] = road_type_code(&road.highway_type);
    block[1] = road.lanes;
    block[2..6].copy_from_slice(&(road.width as f32).to_le_bytes());
    block[6..10].copy_from_slice(&(road.points.len() as u32).to_le_bytes());
    // 6 padding bytes stay zero
    w.write_all(&block)?;

    write_mesh(w, mesh)
}

fn write_mesh<W: Write>(w: &mut W, mesh: &Mesh) -> io::Result<()> {
    w.write_all(&(mesh.vertices.len() as u32).to_le_bytes())?;
    w.write_all(&(mesh.indices.len() as u32).to_le_bytes())?;
    for vertex in &mesh.vertices {
        write_vertex(w, vertex)?;
    }
    for &index in &mesh.indices {
        w.write_all(&index.to_le_bytes())?;
    }
    Ok(())
}

fn write_vertex<W: Write>(w: &mut W, vertex: &Vertex) -> io::Result<()> {
    for component in vertex
        .position
        .iter()
        .chain(vertex.normal.iter())
        .chain(vertex.texcoord.iter())
    {
        w.write_all(&component.to_le_bytes())?;
    }
    Ok(())
}
