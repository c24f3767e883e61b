//! CLI error type.

use thiserror::Error;

/// Anything that makes a command exit non-zero.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] urbanmesh::config::ConfigFileError),

    #[error("invalid --bbox (expected south,west,north,east): {0}")]
    Bbox(String),

    #[error(transparent)]
    Extract(#[from] urbanmesh::osm::OsmError),

    #[error(transparent)]
    Build(#[from] urbanmesh::pipeline::PipelineError),
}
