//! Shared helpers for CLI commands.

use std::path::PathBuf;

use urbanmesh::config::ConfigFile;
use urbanmesh::coord::Bbox;

use crate::error::CliError;

/// Load the config file: an explicit `--config` path must exist, the
/// default location is optional.
pub fn load_config(explicit: Option<&PathBuf>) -> Result<ConfigFile, CliError> {
    match explicit {
        Some(path) => Ok(ConfigFile::load(path)?),
        None => match ConfigFile::default_path() {
            Some(path) => Ok(ConfigFile::load_or_default(&path)?),
            None => Ok(ConfigFile::default()),
        },
    }
}

/// Parse a `south,west,north,east` bounding box argument.
pub fn parse_bbox(raw: &str) -> Result<Bbox, CliError> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        return Err(CliError::Bbox(format!("expected 4 values, got {}", parts.len())));
    }
    let mut values = [0.0f64; 4];
    for (slot, part) in values.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| CliError::Bbox(format!("not a number: {part:?}")))?;
    }
    Bbox::new(values[0], values[1], values[2], values[3])
        .map_err(|e| CliError::Bbox(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bbox_valid() {
        let bbox = parse_bbox("37.390, 126.635, 37.405, 126.660").unwrap();
        assert_eq!(bbox.south, 37.390);
        assert_eq!(bbox.east, 126.660);
    }

    #[test]
    fn test_parse_bbox_wrong_arity() {
        assert!(parse_bbox("1,2,3").is_err());
    }

    #[test]
    fn test_parse_bbox_not_numbers() {
        assert!(parse_bbox("a,b,c,d").is_err());
    }

    #[test]
    fn test_parse_bbox_inverted() {
        assert!(parse_bbox("38.0,126.0,37.0,127.0").is_err());
    }
}
