use std::path::PathBuf;
use thiserror::Error;

/// Fatal conversion errors. Malformed individual records are never errors;
/// they are skipped during parsing.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("input file not found: {0}")]
    InputNotFound(PathBuf),

    #[error("invalid JSON in {path}: {source}")]
    InvalidJson {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(
        "unrecognized timeline format: expected a top-level array, \
         `timelineObjects`, or `semanticSegments`"
    )]
    UnrecognizedFormat,

    #[error("KML encoding failed: {0}")]
    KmlEncode(String),

    #[error("failed to write {path}: {message}")]
    OutputWrite { path: PathBuf, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
