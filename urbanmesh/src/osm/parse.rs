//! Overpass response parsing and tag heuristics.
//!
//! The response is a flat element list: nodes carry coordinates, ways
//! carry node references and tags. Parsing is two passes: build the node
//! coordinate table, then resolve each way into a building footprint or a
//! road centerline. All attribute defaults live here; downstream code
//! receives fully resolved values.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use super::{OsmBuilding, OsmRoad};

/// Meters of height per building level.
const METERS_PER_LEVEL: f64 = 3.0;

/// Meters of road width per lane.
const METERS_PER_LANE: f64 = 3.5;

/// Parse the `elements` array of an Overpass JSON response.
pub fn parse_elements(response: &Value) -> (Vec<OsmBuilding>, Vec<OsmRoad>) {
    let elements = match response.get("elements").and_then(Value::as_array) {
        Some(elements) => elements,
        None => return (Vec::new(), Vec::new()),
    };

    // First pass: node id -> (lon, lat).
    let mut nodes: HashMap<i64, (f64, f64)> = HashMap::new();
    for element in elements {
        if element.get("type").and_then(Value::as_str) == Some("node") {
            if let (Some(id), Some(lon), Some(lat)) = (
                element.get("id").and_then(Value::as_i64),
                element.get("lon").and_then(Value::as_f64),
                element.get("lat").and_then(Value::as_f64),
            ) {
                nodes.insert(id, (lon, lat));
            }
        }
    }
    debug!("parsed {} nodes", nodes.len());

    let mut buildings = Vec::new();
    let mut roads = Vec::new();

    for element in elements {
        if element.get("type").and_then(Value::as_str) != Some("way") {
            continue;
        }
        let id = match element.get("id").and_then(Value::as_i64) {
            Some(id) => id,
            None => continue,
        };
        let empty = Value::Object(Default::default());
        let tags = element.get("tags").unwrap_or(&empty);
        let coordinates = resolve_way_coords(element, &nodes);
        if coordinates.len() < 2 {
            continue;
        }

        if tags.get("building").is_some() {
            buildings.push(OsmBuilding {
                id,
                coordinates,
                height: parse_height(tags),
                levels: parse_integer_tag(tags, "building:levels").unwrap_or(3),
                building_type: string_tag(tags, "building").unwrap_or_else(|| "yes".to_string()),
                name: string_tag(tags, "name"),
            });
        } else if tags.get("highway").is_some() {
            let highway_type =
                string_tag(tags, "highway").unwrap_or_else(|| "residential".to_string());
            roads.push(OsmRoad {
                id,
                width: parse_road_width(tags),
                lanes: parse_integer_tag(tags, "lanes").unwrap_or(2),
                coordinates,
                highway_type,
                name: string_tag(tags, "name"),
            });
        }
    }

    (buildings, roads)
}

fn resolve_way_coords(way: &Value, nodes: &HashMap<i64, (f64, f64)>) -> Vec<(f64, f64)> {
    way.get("nodes")
        .and_then(Value::as_array)
        .map(|refs| {
            refs.iter()
                .filter_map(Value::as_i64)
                .filter_map(|id| nodes.get(&id).copied())
                .collect()
        })
        .unwrap_or_default()
}

/// Building height in meters: explicit `height` tag, then levels at 3 m
/// each, then a per-type default.
pub fn parse_height(tags: &Value) -> f64 {
    if let Some(height) = numeric_tag(tags, "height") {
        return height;
    }
    if let Some(levels) = parse_integer_tag(tags, "building:levels") {
        return levels as f64 * METERS_PER_LEVEL;
    }

    match string_tag(tags, "building").as_deref() {
        Some("apartments") => 30.0,
        Some("commercial") => 15.0,
        Some("office") => 25.0,
        Some("retail") => 8.0,
        Some("industrial") => 12.0,
        Some("warehouse") => 10.0,
        Some("residential") => 10.0,
        Some("house") => 8.0,
        _ => 10.0,
    }
}

/// Road width in meters: explicit `width` tag, then lanes at 3.5 m each,
/// then a per-classification default.
pub fn parse_road_width(tags: &Value) -> f64 {
    if let Some(width) = numeric_tag(tags, "width") {
        return width;
    }
    if let Some(lanes) = parse_integer_tag(tags, "lanes") {
        return lanes as f64 * METERS_PER_LANE;
    }

    match string_tag(tags, "highway").as_deref() {
        Some("motorway") => 14.0,
        Some("trunk") => 12.0,
        Some("primary") => 10.0,
        Some("secondary") => 8.0,
        Some("tertiary") => 7.0,
        Some("residential") => 6.0,
        Some("service") => 4.0,
        Some("footway") => 2.0,
        Some("cycleway") => 2.5,
        Some("path") => 1.5,
        _ => 6.0,
    }
}

fn string_tag(tags: &Value, key: &str) -> Option<String> {
    tags.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Numeric tag value, tolerating unit suffixes like `"12 m"`.
fn numeric_tag(tags: &Value, key: &str) -> Option<f64> {
    static NUMBER: OnceLock<Regex> = OnceLock::new();
    let number = NUMBER.get_or_init(|| {
        Regex::new(r"^\s*-?\d+(\.\d+)?").expect("static regex")
    });

    let raw = tags.get(key).and_then(Value::as_str)?;
    number
        .find(raw)
        .and_then(|m| m.as_str().trim().parse::<f64>().ok())
}

fn parse_integer_tag(tags: &Value, key: &str) -> Option<u32> {
    tags.get(key)
        .and_then(Value::as_str)
        .and_then(|s| s.trim().parse::<u32>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_height_from_explicit_tag() {
        assert_eq!(parse_height(&json!({"height": "25"})), 25.0);
        assert_eq!(parse_height(&json!({"height": "12.5 m"})), 12.5);
        assert_eq!(parse_height(&json!({"height": "12m"})), 12.0);
    }

    #[test]
    fn test_height_from_levels() {
        assert_eq!(parse_height(&json!({"building:levels": "10"})), 30.0);
    }

    #[test]
    fn test_height_tag_beats_levels() {
        let tags = json!({"height": "40", "building:levels": "2"});
        assert_eq!(parse_height(&tags), 40.0);
    }

    #[test]
    fn test_height_per_type_defaults() {
        assert_eq!(parse_height(&json!({"building": "apartments"})), 30.0);
        assert_eq!(parse_height(&json!({"building": "office"})), 25.0);
        assert_eq!(parse_height(&json!({"building": "house"})), 8.0);
        assert_eq!(parse_height(&json!({"building": "yes"})), 10.0);
        assert_eq!(parse_height(&json!({"building": "castle"})), 10.0);
    }

    #[test]
    fn test_unparseable_height_falls_through() {
        let tags = json!({"height": "tall", "building": "office"});
        assert_eq!(parse_height(&tags), 25.0);
    }

    #[test]
    fn test_width_from_tags_and_lanes() {
        assert_eq!(parse_road_width(&json!({"width": "8.5"})), 8.5);
        assert_eq!(parse_road_width(&json!({"lanes": "4"})), 14.0);
        assert_eq!(parse_road_width(&json!({"highway": "footway"})), 2.0);
        assert_eq!(parse_road_width(&json!({"highway": "expressway"})), 6.0);
    }

    fn sample_response() -> Value {
        json!({
            "elements": [
                {"type": "node", "id": 1, "lon": 126.64, "lat": 37.39},
                {"type": "node", "id": 2, "lon": 126.641, "lat": 37.39},
                {"type": "node", "id": 3, "lon": 126.641, "lat": 37.391},
                {"type": "way", "id": 100, "nodes": [1, 2, 3, 1],
                 "tags": {"building": "office", "building:levels": "5", "name": "Tower"}},
                {"type": "way", "id": 200, "nodes": [1, 2],
                 "tags": {"highway": "primary", "lanes": "4"}},
                {"type": "way", "id": 300, "nodes": [7, 8],
                 "tags": {"highway": "service"}}
            ]
        })
    }

    #[test]
    fn test_parse_elements_splits_buildings_and_roads() {
        let (buildings, roads) = parse_elements(&sample_response());

        assert_eq!(buildings.len(), 1);
        let building = &buildings[0];
        assert_eq!(building.id, 100);
        assert_eq!(building.coordinates.len(), 4);
        assert_eq!(building.height, 15.0, "5 levels at 3 m each");
        assert_eq!(building.levels, 5);
        assert_eq!(building.building_type, "office");
        assert_eq!(building.name.as_deref(), Some("Tower"));

        // Way 300 references unknown nodes and resolves to no coordinates.
        assert_eq!(roads.len(), 1);
        let road = &roads[0];
        assert_eq!(road.id, 200);
        assert_eq!(road.highway_type, "primary");
        assert_eq!(road.lanes, 4);
        assert_eq!(road.width, 14.0);
    }

    #[test]
    fn test_building_tag_wins_over_highway() {
        let response = json!({
            "elements": [
                {"type": "node", "id": 1, "lon": 0.0, "lat": 0.0},
                {"type": "node", "id": 2, "lon": 0.001, "lat": 0.0},
                {"type": "way", "id": 5, "nodes": [1, 2],
                 "tags": {"building": "yes", "highway": "service"}}
            ]
        });
        let (buildings, roads) = parse_elements(&response);
        assert_eq!(buildings.len(), 1);
        assert!(roads.is_empty());
    }

    #[test]
    fn test_empty_response() {
        let (buildings, roads) = parse_elements(&json!({}));
        assert!(buildings.is_empty());
        assert!(roads.is_empty());
    }
}
