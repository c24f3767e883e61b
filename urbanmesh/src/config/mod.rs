//! Optional `config.ini` support.
//!
//! Every setting has a default and every CLI flag overrides the file, so
//! the file is purely a convenience for pinning a region:
//!
//! ```ini
//! [region]
//! origin_latitude = 37.355
//! origin_longitude = 126.615
//! bbox_south = 37.355
//! bbox_west = 126.615
//! bbox_north = 37.425
//! bbox_east = 126.725
//!
//! [chunks]
//! size_meters = 500
//!
//! [output]
//! directory = output
//! ```

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use crate::coord::{Bbox, CoordError, Origin};
use crate::pipeline::DEFAULT_CHUNK_SIZE_METERS;

/// Errors loading or interpreting a config file.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("failed to load config file: {0}")]
    Load(#[from] ini::Error),

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("invalid bounding box in config: {0}")]
    Bbox(#[from] CoordError),
}

/// Settings read from `config.ini`, with defaults for everything absent.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub origin: Origin,
    pub bbox: Bbox,
    pub chunk_size: f64,
    pub output_dir: Option<PathBuf>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            origin: Origin::default(),
            bbox: Bbox::default(),
            chunk_size: DEFAULT_CHUNK_SIZE_METERS,
            output_dir: None,
        }
    }
}

impl ConfigFile {
    /// Default location: `<user config dir>/urbanmesh/config.ini`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("urbanmesh").join("config.ini"))
    }

    /// Load a config file, or defaults when `path` does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        let ini = Ini::load_from_file(path)?;
        let mut config = Self::default();

        if let Some(region) = ini.section(Some("region")) {
            let mut bbox = config.bbox;
            if let Some(v) = get_f64(region.get("origin_latitude"), "origin_latitude")? {
                config.origin.latitude = v;
            }
            if let Some(v) = get_f64(region.get("origin_longitude"), "origin_longitude")? {
                config.origin.longitude = v;
            }
            if let Some(v) = get_f64(region.get("bbox_south"), "bbox_south")? {
                bbox.south = v;
            }
            if let Some(v) = get_f64(region.get("bbox_west"), "bbox_west")? {
                bbox.west = v;
            }
            if let Some(v) = get_f64(region.get("bbox_north"), "bbox_north")? {
                bbox.north = v;
            }
            if let Some(v) = get_f64(region.get("bbox_east"), "bbox_east")? {
                bbox.east = v;
            }
            config.bbox = Bbox::new(bbox.south, bbox.west, bbox.north, bbox.east)?;
        }

        if let Some(chunks) = ini.section(Some("chunks")) {
            if let Some(v) = get_f64(chunks.get("size_meters"), "size_meters")? {
                config.chunk_size = v;
            }
        }

        if let Some(output) = ini.section(Some("output")) {
            if let Some(dir) = output.get("directory") {
                config.output_dir = Some(PathBuf::from(dir));
            }
        }

        Ok(config)
    }
}

fn get_f64(raw: Option<&str>, key: &'static str) -> Result<Option<f64>, ConfigFileError> {
    match raw {
        None => Ok(None),
        Some(text) => text
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| ConfigFileError::InvalidValue {
                key,
                value: text.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = ConfigFile::load_or_default(Path::new("/nonexistent/config.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_full_file() {
        let file = write_temp(
            "[region]\n\
             origin_latitude = 37.39\n\
             origin_longitude = 126.635\n\
             bbox_south = 37.390\n\
             bbox_west = 126.635\n\
             bbox_north = 37.405\n\
             bbox_east = 126.660\n\
             \n\
             [chunks]\n\
             size_meters = 250\n\
             \n\
             [output]\n\
             directory = /tmp/map-out\n",
        );
        let config = ConfigFile::load(file.path()).unwrap();
        assert_eq!(config.origin, Origin::new(37.39, 126.635));
        assert_eq!(config.bbox.north, 37.405);
        assert_eq!(config.chunk_size, 250.0);
        assert_eq!(config.output_dir, Some(PathBuf::from("/tmp/map-out")));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_temp("[chunks]\nsize_meters = 100\n");
        let config = ConfigFile::load(file.path()).unwrap();
        assert_eq!(config.chunk_size, 100.0);
        assert_eq!(config.origin, Origin::default());
        assert_eq!(config.bbox, Bbox::default());
    }

    #[test]
    fn test_unparseable_number_is_an_error() {
        let file = write_temp("[chunks]\nsize_meters = lots\n");
        let result = ConfigFile::load(file.path());
        assert!(matches!(
            result,
            Err(ConfigFileError::InvalidValue {
                key: "size_meters",
                ..
            })
        ));
    }

    #[test]
    fn test_inverted_bbox_is_an_error() {
        let file = write_temp(
            "[region]\n\
             bbox_south = 38.0\n\
             bbox_north = 37.0\n",
        );
        assert!(matches!(
            ConfigFile::load(file.path()),
            Err(ConfigFileError::Bbox(_))
        ));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let file = write_temp("[region]\nfuture_knob = 1\n[misc]\nx = y\n");
        assert!(ConfigFile::load(file.path()).is_ok());
    }
}
