//! Error types for PuffsIndex domain operations.

use thiserror::Error;

/// Result type alias using PuffsError.
pub type PuffsResult<T> = Result<T, PuffsError>;

/// Errors raised while building or querying the static place data.
#[derive(Debug, Error)]
pub enum PuffsError {
    #[error("Invalid coordinates '{value}': {message}")]
    InvalidCoordinates { value: String, message: String },

    #[error("Duplicate place name: {0}")]
    DuplicatePlace(String),

    #[error("Empty place name")]
    EmptyPlaceName,

    #[error("Failed to parse place table: {0}")]
    PlaceTableParse(String),

    #[error("Failed to read place table {path}: {source}")]
    PlaceTableRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<serde_yaml::Error> for PuffsError {
    fn from(e: serde_yaml::Error) -> Self {
        PuffsError::PlaceTableParse(e.to_string())
    }
}
