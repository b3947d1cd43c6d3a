//! Panorama metadata
//!
//! Resolves a photo identifier into the full-resolution dimensions and tile
//! size of its pyramid.

mod parser;
mod resolver;
mod types;

pub use parser::parse_metadata;
pub use resolver::MetadataResolver;
pub use types::{MetadataError, PanoramaMetadata};
