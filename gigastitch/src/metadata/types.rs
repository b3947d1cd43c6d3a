//! Metadata type definitions

use crate::provider::ProviderError;
use thiserror::Error;

/// Full-resolution dimensions of a tiled panorama.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanoramaMetadata {
    /// Width of the highest pyramid level in pixels
    pub max_width: u32,
    /// Height of the highest pyramid level in pixels
    pub max_height: u32,
    /// Edge length of the square tiles in pixels
    pub tile_size: u32,
}

/// Errors from fetching or parsing panorama metadata.
///
/// All variants are fatal: without metadata there is no grid to download.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// Transport failed or the host returned a non-success status
    #[error("Failed to fetch metadata for photo {photo_id}: {source}")]
    Fetch {
        photo_id: u64,
        #[source]
        source: ProviderError,
    },

    /// Document is not readable XML
    #[error("Failed to parse metadata document: {0}")]
    Parse(String),

    /// A required element is absent
    #[error("Metadata is missing required field '{0}'")]
    MissingField(&'static str),

    /// A required element is present but not a positive integer
    #[error("Metadata field '{field}' has invalid value '{value}': {reason}")]
    InvalidField {
        field: &'static str,
        value: String,
        reason: String,
    },
}
