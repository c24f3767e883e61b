//! GeoJSON and metadata output for extracted OSM data.

use std::fs;
use std::path::Path;

use serde_json::{json, Value};
use tracing::info;

use crate::coord;

use super::{OsmData, OsmError};

/// Write `buildings.geojson`, `roads.geojson` and `metadata.json` into the
/// output directory, creating it when needed.
pub fn save_geojson(data: &OsmData, out_dir: &Path) -> Result<(), OsmError> {
    fs::create_dir_all(out_dir)?;

    let buildings = buildings_feature_collection(data);
    write_json(&out_dir.join("buildings.geojson"), &buildings)?;

    let roads = roads_feature_collection(data);
    write_json(&out_dir.join("roads.geojson"), &roads)?;

    let metadata = json!({
        "bbox": data.bbox,
        "building_count": data.buildings.len(),
        "road_count": data.roads.len(),
        "total_road_length_km": total_road_length_km(data),
        "extracted_at": chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    });
    write_json(&out_dir.join("metadata.json"), &metadata)?;

    info!(
        "saved {} buildings and {} roads to {}",
        data.buildings.len(),
        data.roads.len(),
        out_dir.display()
    );
    Ok(())
}

fn buildings_feature_collection(data: &OsmData) -> Value {
    let features: Vec<Value> = data
        .buildings
        .iter()
        .filter(|b| b.coordinates.len() >= 3)
        .map(|b| {
            // GeoJSON polygons must close their rings explicitly.
            let mut ring = b.coordinates.clone();
            if ring.first() != ring.last() {
                ring.push(ring[0]);
            }
            let coordinates: Vec<Vec<f64>> =
                ring.iter().map(|&(lon, lat)| vec![lon, lat]).collect();
            json!({
                "type": "Feature",
                "id": b.id,
                "properties": {
                    "height": b.height,
                    "levels": b.levels,
                    "building_type": b.building_type,
                    "name": b.name,
                },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [coordinates],
                }
            })
        })
        .collect();

    json!({"type": "FeatureCollection", "features": features})
}

fn roads_feature_collection(data: &OsmData) -> Value {
    let features: Vec<Value> = data
        .roads
        .iter()
        .filter(|r| r.coordinates.len() >= 2)
        .map(|r| {
            let coordinates: Vec<Vec<f64>> = r
                .coordinates
                .iter()
                .map(|&(lon, lat)| vec![lon, lat])
                .collect();
            json!({
                "type": "Feature",
                "id": r.id,
                "properties": {
                    "highway_type": r.highway_type,
                    "name": r.name,
                    "lanes": r.lanes,
                    "width": r.width,
                },
                "geometry": {
                    "type": "LineString",
                    "coordinates": coordinates,
                }
            })
        })
        .collect();

    json!({"type": "FeatureCollection", "features": features})
}

/// Total centerline length across all roads, in kilometers, measured with
/// the pipeline's projection scales.
fn total_road_length_km(data: &OsmData) -> f64 {
    let mut total_m = 0.0;
    for road in &data.roads {
        for pair in road.coordinates.windows(2) {
            let dx = (pair[1].0 - pair[0].0) * coord::lon_to_meters();
            let dz = (pair[1].1 - pair[0].1) * coord::LAT_TO_METERS;
            total_m += (dx * dx + dz * dz).sqrt();
        }
    }
    total_m / 1000.0
}

fn write_json(path: &Path, value: &Value) -> Result<(), OsmError> {
    let bytes = serde_json::to_vec_pretty(value)?;
    fs::write(path, bytes)?;
    Ok(())
}
