//! Geographic coordinate types shared across the pipeline.

use serde::Serialize;
use thiserror::Error;

/// Errors produced when validating geographic inputs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoordError {
    /// Latitude outside the valid -90..=90 range.
    #[error("invalid latitude {0} (expected -90 to 90)")]
    InvalidLatitude(f64),

    /// Longitude outside the valid -180..=180 range.
    #[error("invalid longitude {0} (expected -180 to 180)")]
    InvalidLongitude(f64),

    /// Bounding box whose north/east edge does not exceed its south/west edge.
    #[error("empty bounding box: south {south}, west {west}, north {north}, east {east}")]
    EmptyBbox {
        south: f64,
        west: f64,
        north: f64,
        east: f64,
    },
}

/// Anchor point of the local-metric frame.
///
/// Every projected coordinate is relative to this geographic point; it is
/// also recorded verbatim in the index manifest so the renderer can place
/// the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Origin {
    pub latitude: f64,
    pub longitude: f64,
}

impl Origin {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl Default for Origin {
    /// Lower-left corner of the default extraction region.
    fn default() -> Self {
        Self {
            latitude: 37.355,
            longitude: 126.615,
        }
    }
}

/// Geographic bounding box in the `south, west, north, east` convention
/// used by the Overpass API.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bbox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bbox {
    /// Create a bounding box, validating ranges and non-emptiness.
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Result<Self, CoordError> {
        for lat in [south, north] {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(CoordError::InvalidLatitude(lat));
            }
        }
        for lon in [west, east] {
            if !(-180.0..=180.0).contains(&lon) {
                return Err(CoordError::InvalidLongitude(lon));
            }
        }
        if north <= south || east <= west {
            return Err(CoordError::EmptyBbox {
                south,
                west,
                north,
                east,
            });
        }
        Ok(Self {
            south,
            west,
            north,
            east,
        })
    }

    /// The box corner used as the projection origin (south-west).
    pub fn origin(&self) -> Origin {
        Origin::new(self.south, self.west)
    }

    /// Render as the `south,west,north,east` string Overpass QL expects.
    pub fn overpass_string(&self) -> String {
        format!("{},{},{},{}", self.south, self.west, self.north, self.east)
    }
}

impl Default for Bbox {
    /// Default extraction region, roughly 10 km x 8 km of urban waterfront.
    fn default() -> Self {
        Self {
            south: 37.355,
            west: 126.615,
            north: 37.425,
            east: 126.725,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_new_valid() {
        let bbox = Bbox::new(37.0, 126.0, 38.0, 127.0).unwrap();
        assert_eq!(bbox.south, 37.0);
        assert_eq!(bbox.east, 127.0);
    }

    #[test]
    fn test_bbox_rejects_bad_latitude() {
        let result = Bbox::new(-91.0, 0.0, 0.0, 1.0);
        assert!(matches!(result, Err(CoordError::InvalidLatitude(_))));
    }

    #[test]
    fn test_bbox_rejects_bad_longitude() {
        let result = Bbox::new(0.0, -181.0, 1.0, 0.0);
        assert!(matches!(result, Err(CoordError::InvalidLongitude(_))));
    }

    #[test]
    fn test_bbox_rejects_empty() {
        let result = Bbox::new(37.0, 126.0, 37.0, 127.0);
        assert!(matches!(result, Err(CoordError::EmptyBbox { .. })));
    }

    #[test]
    fn test_bbox_overpass_string() {
        let bbox = Bbox::new(37.355, 126.615, 37.425, 126.725).unwrap();
        assert_eq!(bbox.overpass_string(), "37.355,126.615,37.425,126.725");
    }

    #[test]
    fn test_bbox_origin_is_south_west() {
        let bbox = Bbox::new(37.39, 126.635, 37.405, 126.66).unwrap();
        let origin = bbox.origin();
        assert_eq!(origin.latitude, 37.39);
        assert_eq!(origin.longitude, 126.635);
    }

    #[test]
    fn test_default_origin_matches_default_bbox() {
        assert_eq!(Origin::default(), Bbox::default().origin());
    }

    #[test]
    fn test_origin_serializes_with_named_fields() {
        let json = serde_json::to_value(Origin::default()).unwrap();
        assert!(json["latitude"].is_f64());
        assert!(json["longitude"].is_f64());
    }
}
