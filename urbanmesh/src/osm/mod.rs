//! OpenStreetMap data extraction via the Overpass API.
//!
//! The extractor posts one Overpass QL query for a bounding box, falling
//! back across several public endpoints, and flattens the response into
//! building footprints and road centerlines with all attribute defaults
//! resolved. Results are written as GeoJSON, which is exactly the format
//! the chunk-building side consumes.

mod geojson;
mod http;
mod parse;
mod query;

pub use geojson::save_geojson;
pub use http::{HttpClient, ReqwestClient};
pub use query::build_query;

use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::coord::Bbox;

/// Public Overpass API endpoints, tried in order.
pub const OVERPASS_ENDPOINTS: &[&str] = &[
    "https://overpass.kumi.systems/api/interpreter",
    "https://overpass-api.de/api/interpreter",
    "https://z.overpass-api.de/api/interpreter",
];

/// Default Overpass request timeout. Large-area queries are slow to
/// evaluate server-side.
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Errors from extraction or from writing its outputs.
#[derive(Debug, Error)]
pub enum OsmError {
    /// Transport-level failure talking to an endpoint.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Every configured endpoint failed.
    #[error("all {0} Overpass endpoints failed")]
    AllEndpointsFailed(usize),

    /// The response body is not the JSON we expect.
    #[error("failed to parse Overpass response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Filesystem failure writing outputs.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// A building way resolved from the response, with attribute defaults
/// applied.
#[derive(Debug, Clone, PartialEq)]
pub struct OsmBuilding {
    pub id: i64,
    pub coordinates: Vec<(f64, f64)>,
    pub height: f64,
    pub levels: u32,
    pub building_type: String,
    pub name: Option<String>,
}

/// A highway way resolved from the response.
#[derive(Debug, Clone, PartialEq)]
pub struct OsmRoad {
    pub id: i64,
    pub coordinates: Vec<(f64, f64)>,
    pub highway_type: String,
    pub name: Option<String>,
    pub lanes: u32,
    pub width: f64,
}

/// Everything extracted for one bounding box.
#[derive(Debug, Clone)]
pub struct OsmData {
    pub buildings: Vec<OsmBuilding>,
    pub roads: Vec<OsmRoad>,
    pub bbox: Bbox,
}

/// Fetches and parses OSM data for one bounding box.
pub struct OsmExtractor {
    bbox: Bbox,
    timeout_secs: u64,
    endpoints: Vec<String>,
    http: Box<dyn HttpClient>,
}

impl OsmExtractor {
    /// Create an extractor with the default HTTP client and endpoints.
    pub fn new(bbox: Bbox, timeout_secs: u64) -> Result<Self, OsmError> {
        Ok(Self {
            bbox,
            timeout_secs,
            endpoints: OVERPASS_ENDPOINTS.iter().map(|s| s.to_string()).collect(),
            http: Box::new(ReqwestClient::new(timeout_secs)?),
        })
    }

    /// Create an extractor with an injected HTTP client, for tests or
    /// custom transports.
    pub fn with_http(bbox: Bbox, timeout_secs: u64, http: Box<dyn HttpClient>) -> Self {
        Self {
            bbox,
            timeout_secs,
            endpoints: OVERPASS_ENDPOINTS.iter().map(|s| s.to_string()).collect(),
            http,
        }
    }

    /// Override the endpoint list.
    pub fn with_endpoints(mut self, endpoints: Vec<String>) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// POST the query to each endpoint in order until one answers.
    fn fetch(&self) -> Result<Value, OsmError> {
        let query = build_query(&self.bbox, true, true, self.timeout_secs);
        info!(
            "fetching OSM data for bbox {}",
            self.bbox.overpass_string()
        );

        for endpoint in &self.endpoints {
            match self.http.post_form(endpoint, &[("data", query.as_str())]) {
                Ok(body) => {
                    info!("got {} bytes from {endpoint}", body.len());
                    return Ok(serde_json::from_slice(&body)?);
                }
                Err(e) => {
                    warn!("endpoint {endpoint} failed: {e}");
                }
            }
        }
        Err(OsmError::AllEndpointsFailed(self.endpoints.len()))
    }

    /// Fetch and flatten the data for the configured bounding box.
    pub fn extract(&self) -> Result<OsmData, OsmError> {
        let response = self.fetch()?;
        let (buildings, roads) = parse::parse_elements(&response);
        info!(
            "parsed {} buildings and {} roads",
            buildings.len(),
            roads.len()
        );
        Ok(OsmData {
            buildings,
            roads,
            bbox: self.bbox,
        })
    }
}
