//! Overpass QL query construction.

use crate::coord::Bbox;

/// Build the Overpass QL query for a bounding box.
///
/// Selects building ways and relations and highway ways, then recurses
/// into their nodes so the response is self-contained.
pub fn build_query(
    bbox: &Bbox,
    include_buildings: bool,
    include_roads: bool,
    timeout_secs: u64,
) -> String {
    let bounds = bbox.overpass_string();
    let mut selectors = String::new();

    if include_buildings {
        selectors.push_str(&format!(
            "  way[\"building\"]({bounds});\n  relation[\"building\"]({bounds});\n"
        ));
    }
    if include_roads {
        selectors.push_str(&format!("  way[\"highway\"]({bounds});\n"));
    }

    format!(
        "[out:json][timeout:{timeout_secs}];\n(\n{selectors});\nout body;\n>;\nout skel qt;\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox() -> Bbox {
        Bbox::new(37.355, 126.615, 37.425, 126.725).unwrap()
    }

    #[test]
    fn test_query_contains_bbox_and_selectors() {
        let query = build_query(&bbox(), true, true, 600);
        assert!(query.contains("[out:json][timeout:600];"));
        assert!(query.contains("way[\"building\"](37.355,126.615,37.425,126.725);"));
        assert!(query.contains("relation[\"building\"](37.355,126.615,37.425,126.725);"));
        assert!(query.contains("way[\"highway\"](37.355,126.615,37.425,126.725);"));
        assert!(query.contains("out skel qt;"));
    }

    #[test]
    fn test_buildings_only() {
        let query = build_query(&bbox(), true, false, 600);
        assert!(query.contains("way[\"building\"]"));
        assert!(!query.contains("highway"));
    }

    #[test]
    fn test_roads_only() {
        let query = build_query(&bbox(), false, true, 600);
        assert!(!query.contains("building"));
        assert!(query.contains("way[\"highway\"]"));
    }
}
