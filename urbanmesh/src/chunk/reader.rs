//! Chunk container reader.
//!
//! The reading half of the serialization contract: parsing a written chunk
//! must reproduce the exact vertex and index sequences that were fed to the
//! writer. The renderer consumes the same layout; this implementation is
//! also what the round-trip tests run against.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::mesh::{Mesh, Vertex};

use super::writer::{FORMAT_VERSION, HEADER_SIZE, MAGIC};

/// Errors produced while parsing a chunk file.
#[derive(Debug, Error)]
pub enum ChunkReadError {
    #[error("failed to read chunk file: {0}")]
    Io(#[from] std::io::Error),

    #[error("bad magic {found:?}, expected {expected:?}")]
    BadMagic { found: [u8; 4], expected: [u8; 4] },

    #[error("unsupported chunk format version {0}")]
    UnsupportedVersion(u32),

    #[error("truncated chunk file while reading {0}")]
    Truncated(&'static str),

    #[error("section offset {offset} outside file of {len} bytes")]
    BadOffset { offset: u64, len: u64 },
}

/// A parsed building record.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingRecord {
    pub position: [f32; 3],
    pub rotation: f32,
    pub scale: [f32; 3],
    pub height: f32,
    pub texture_id: u16,
    pub flags: u16,
    pub color_rgba: u32,
    pub mesh: Mesh,
}

/// A parsed road record.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadRecord {
    pub road_type: u8,
    pub lanes: u8,
    pub width: f32,
    pub point_count: u32,
    pub mesh: Mesh,
}

/// A fully parsed chunk file.
#[derive(Debug, Clone)]
pub struct ChunkFile {
    pub cx: i32,
    pub cy: i32,
    pub buildings: Vec<BuildingRecord>,
    pub roads: Vec<RoadRecord>,
}

/// Read and validate a chunk file.
pub fn read_chunk(path: &Path) -> Result<ChunkFile, ChunkReadError> {
    parse_chunk(&fs::read(path)?)
}

/// Parse a chunk from raw bytes.
pub fn parse_chunk(bytes: &[u8]) -> Result<ChunkFile, ChunkReadError> {
    if bytes.len() < HEADER_SIZE as usize {
        return Err(ChunkReadError::Truncated("header"));
    }

    let magic: [u8; 4] = bytes[0..4].try_into().expect("slice length checked");
    if magic != MAGIC {
        return Err(ChunkReadError::BadMagic {
            found: magic,
            expected: MAGIC,
        });
    }

    let mut cursor = Cursor::new(bytes, 4);
    let version = cursor.u32("version")?;
    if version != FORMAT_VERSION {
        return Err(ChunkReadError::UnsupportedVersion(version));
    }

    let cx = cursor.i32("cx")?;
    let cy = cursor.i32("cy")?;
    let building_count = cursor.u32("building count")?;
    let road_count = cursor.u32("road count")?;
    let building_section = cursor.u64("building section offset")?;
    let road_section = cursor.u64("road section offset")?;

    for offset in [building_section, road_section] {
        if offset < HEADER_SIZE || offset > bytes.len() as u64 {
            return Err(ChunkReadError::BadOffset {
                offset,
                len: bytes.len() as u64,
            });
        }
    }

    let mut cursor = Cursor::new(bytes, building_section as usize);
    let mut buildings = Vec::with_capacity(building_count as usize);
    for _ in 0..building_count {
        buildings.push(read_building_record(&mut cursor)?);
    }

    let mut cursor = Cursor::new(bytes, road_section as usize);
    let mut roads = Vec::with_capacity(road_count as usize);
    for _ in 0..road_count {
        roads.push(read_road_record(&mut cursor)?);
    }

    Ok(ChunkFile {
        cx,
        cy,
        buildings,
        roads,
    })
}

fn read_building_record(cursor: &mut Cursor<'_>) -> Result<BuildingRecord, ChunkReadError> {
    let position = [
        cursor.f32("building position")?,
        cursor.f32("building position")?,
        cursor.f32("building position")?,
    ];
    let rotation = cursor.f32("building rotation")?;
    let scale = [
        cursor.f32("building scale")?,
        cursor.f32("building scale")?,
        cursor.f32("building scale")?,
    ];
    let height = cursor.f32("building height")?;
    let texture_id = cursor.u16("texture id")?;
    let flags = cursor.u16("flags")?;
    let color_rgba = cursor.u32("color")?;
    cursor.skip(8, "building reserved")?;
    let mesh = read_mesh(cursor)?;

    Ok(BuildingRecord {
        position,
        rotation,
        scale,
        height,
        texture_id,
        flags,
        color_rgba,
        mesh,
    })
}

fn read_road_record(cursor: &mut Cursor<'_>) -> Result<RoadRecord, ChunkReadError> {
    let road_type = cursor.u8("road type")?;
    let lanes = cursor.u8("lanes")?;
    let width = cursor.f32("road width")?;
    let point_count = cursor.u32("point count")?;
    cursor.skip(6, "road padding")?;
    let mesh = read_mesh(cursor)?;

    Ok(RoadRecord {
        road_type,
        lanes,
        width,
        point_count,
        mesh,
    })
}

fn read_mesh(cursor: &mut Cursor<'_>) -> Result<Mesh, ChunkReadError> {
    let vertex_count = cursor.u32("vertex count")? as usize;
    let index_count = cursor.u32("index count")? as usize;

    let mut vertices = Vec::with_capacity(vertex_count);
    for _ in 0..vertex_count {
        let mut values = [0.0f32; 8];
        for value in &mut values {
            *value = cursor.f32("vertex data")?;
        }
        vertices.push(Vertex::new(
            [values[0], values[1], values[2]],
            [values[3], values[4], values[5]],
            [values[6], values[7]],
        ));
    }

    let mut indices = Vec::with_capacity(index_count);
    for _ in 0..index_count {
        indices.push(cursor.u32("index data")?);
    }

    Ok(Mesh { vertices, indices })
}

/// Bounds-checked little-endian reads over a byte slice.
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8], pos: usize) -> Self {
        Self { bytes, pos }
    }

    fn take(&mut self, n: usize, what: &'static str) -> Result<&'a [u8], ChunkReadError> {
        if self.pos + n > self.bytes.len() {
            return Err(ChunkReadError::Truncated(what));
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn skip(&mut self, n: usize, what: &'static str) -> Result<(), ChunkReadError> {
        self.take(n, what).map(|_| ())
    }

    fn u8(&mut self, what: &'static str) -> Result<u8, ChunkReadError> {
        Ok(self.take(1, what)?[0])
    }

    fn u16(&mut self, what: &'static str) -> Result<u16, ChunkReadError> {
        let b = self.take(2, what)?;
        Ok(u16::from_le_bytes(b.try_into().expect("length checked")))
    }

    fn u32(&mut self, what: &'static str) -> Result<u32, ChunkReadError> {
        let b = self.take(4, what)?;
        Ok(u32::from_le_bytes(b.try_into().expect("length checked")))
    }

    fn i32(&mut self, what: &'static str) -> Result<i32, ChunkReadError> {
        let b = self.take(4, what)?;
        Ok(i32::from_le_bytes(b.try_into().expect("length checked")))
    }

    fn u64(&mut self, what: &'static str) -> Result<u64, ChunkReadError> {
        let b = self.take(8, what)?;
        Ok(u64::from_le_bytes(b.try_into().expect("length checked")))
    }

    fn f32(&mut self, what: &'static str) -> Result<f32, ChunkReadError> {
        let b = self.take(4, what)?;
        Ok(f32::from_le_bytes(b.try_into().expect("length checked")))
    }
}
