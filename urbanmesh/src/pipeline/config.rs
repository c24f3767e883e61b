//! Pipeline configuration.

use thiserror::Error;

use crate::coord::Origin;

/// Default grid cell edge length in meters.
pub const DEFAULT_CHUNK_SIZE_METERS: f64 = 500.0;

/// Configuration rejected before the pipeline starts.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("chunk size must be positive, got {0}")]
    InvalidChunkSize(f64),

    #[error("origin latitude {0} out of range (-90 to 90)")]
    InvalidOriginLatitude(f64),

    #[error("origin longitude {0} out of range (-180 to 180)")]
    InvalidOriginLongitude(f64),
}

/// Everything the chunk builder needs to know: where the local frame is
/// anchored and how large the grid cells are.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    pub origin: Origin,
    pub chunk_size: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            origin: Origin::default(),
            chunk_size: DEFAULT_CHUNK_SIZE_METERS,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: f64) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Validate before use; the pipeline refuses to start on any failure.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.chunk_size > 0.0) {
            return Err(ConfigError::InvalidChunkSize(self.chunk_size));
        }
        if !(-90.0..=90.0).contains(&self.origin.latitude) {
            return Err(ConfigError::InvalidOriginLatitude(self.origin.latitude));
        }
        if !(-180.0..=180.0).contains(&self.origin.longitude) {
            return Err(ConfigError::InvalidOriginLongitude(self.origin.longitude));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_builder_overrides() {
        let config = PipelineConfig::new()
            .with_origin(Origin::new(37.39, 126.635))
            .with_chunk_size(250.0);
        assert_eq!(config.chunk_size, 250.0);
        assert_eq!(config.origin.latitude, 37.39);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let config = PipelineConfig::new().with_chunk_size(0.0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidChunkSize(0.0))
        );
    }

    #[test]
    fn test_negative_chunk_size_rejected() {
        let config = PipelineConfig::new().with_chunk_size(-5.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidChunkSize(_))
        ));
    }

    #[test]
    fn test_nan_chunk_size_rejected() {
        let config = PipelineConfig::new().with_chunk_size(f64::NAN);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidChunkSize(_))
        ));
    }

    #[test]
    fn test_out_of_range_origin_rejected() {
        let config = PipelineConfig::new().with_origin(Origin::new(91.0, 0.0));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidOriginLatitude(_))
        ));

        let config = PipelineConfig::new().with_origin(Origin::new(0.0, 200.0));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidOriginLongitude(_))
        ));
    }
}
