//! GeoJSON input boundary.
//!
//! Loads building and road FeatureCollections into flattened feature
//! structs. A malformed feature is skipped with a warning and the rest of
//! the collection is processed; only unreadable or unparseable files abort
//! the load.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use super::{BuildingFeature, RoadFeature};

/// Errors that abort loading an input file.
#[derive(Debug, Error)]
pub enum InputError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON.
    #[error("failed to parse {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The document is not a FeatureCollection.
    #[error("{path}: expected a FeatureCollection")]
    NotFeatureCollection { path: String },
}

/// Load building features, skipping malformed entries.
pub fn load_buildings(path: &Path) -> Result<Vec<BuildingFeature>, InputError> {
    let features = read_feature_array(path)?;
    let mut buildings = Vec::new();
    for (idx, feature) in features.iter().enumerate() {
        match parse_building(feature) {
            Some(building) => buildings.push(building),
            None => warn!(
                "skipping malformed building feature #{idx} in {}",
                path.display()
            ),
        }
    }
    Ok(buildings)
}

/// Load road features, skipping malformed entries.
pub fn load_roads(path: &Path) -> Result<Vec<RoadFeature>, InputError> {
    let features = read_feature_array(path)?;
    let mut roads = Vec::new();
    for (idx, feature) in features.iter().enumerate() {
        match parse_road(feature) {
            Some(road) => roads.push(road),
            None => warn!(
                "skipping malformed road feature #{idx} in {}",
                path.display()
            ),
        }
    }
    Ok(roads)
}

fn read_feature_array(path: &Path) -> Result<Vec<Value>, InputError> {
    let text = fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let value: Value = serde_json::from_str(&text).map_err(|source| InputError::Json {
        path: path.display().to_string(),
        source,
    })?;
    match value.get("features").and_then(Value::as_array) {
        Some(features) => Ok(features.clone()),
        None => Err(InputError::NotFeatureCollection {
            path: path.display().to_string(),
        }),
    }
}

fn parse_building(feature: &Value) -> Option<BuildingFeature> {
    let geometry = feature.get("geometry")?;
    if geometry.get("type")?.as_str()? != "Polygon" {
        return None;
    }
    // Outer ring only; inner rings are ignored.
    let ring = coord_list(geometry.get("coordinates")?.get(0)?)?;
    if distinct_vertex_count(&ring) < 3 {
        return None;
    }

    let properties = feature.get("properties")?;
    let height = properties.get("height")?.as_f64()?;
    if height <= 0.0 {
        return None;
    }
    let building_type = properties
        .get("building_type")
        .and_then(Value::as_str)
        .unwrap_or("yes")
        .to_string();

    Some(BuildingFeature {
        id: feature.get("id").and_then(Value::as_i64),
        ring,
        height,
        building_type,
    })
}

fn parse_road(feature: &Value) -> Option<RoadFeature> {
    let geometry = feature.get("geometry")?;
    if geometry.get("type")?.as_str()? != "LineString" {
        return None;
    }
    let points = coord_list(geometry.get("coordinates")?)?;
    if points.len() < 2 {
        return None;
    }

    let properties = feature.get("properties")?;
    let width = properties.get("width")?.as_f64()?;
    if width <= 0.0 {
        return None;
    }
    let highway_type = properties
        .get("highway_type")
        .and_then(Value::as_str)
        .unwrap_or("residential")
        .to_string();
    let lanes = properties
        .get("lanes")
        .and_then(Value::as_u64)
        .map(|l| l.min(u8::MAX as u64) as u8)
        .unwrap_or(2);

    Some(RoadFeature {
        id: feature.get("id").and_then(Value::as_i64),
        points,
        highway_type,
        width,
        lanes,
    })
}

/// Parse a `[[lon, lat], ...]` array, rejecting non-numeric entries.
fn coord_list(value: &Value) -> Option<Vec<(f64, f64)>> {
    let array = value.as_array()?;
    let mut coords = Vec::with_capacity(array.len());
    for pair in array {
        let pair = pair.as_array()?;
        if pair.len() < 2 {
            return None;
        }
        coords.push((pair[0].as_f64()?, pair[1].as_f64()?));
    }
    Some(coords)
}

/// Count distinct vertices, excluding a closing duplicate.
fn distinct_vertex_count(ring: &[(f64, f64)]) -> usize {
    let mut seen: HashSet<(u64, u64)> = HashSet::with_capacity(ring.len());
    for &(x, y) in ring {
        seen.insert((x.to_bits(), y.to_bits()));
    }
    seen.len()
}
