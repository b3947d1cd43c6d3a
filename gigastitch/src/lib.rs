//! gigastitch - download and stitch tiled gigapixel panoramas
//!
//! A panorama is served as a pyramid of fixed-size JPEG tiles. This library
//! resolves the pyramid from the panorama's KML description, downloads the
//! tiles for one level into a resumable on-disk store, and composes them
//! into a single trimmed image.
//!
//! # High-Level API
//!
//! ```ignore
//! use gigastitch::pipeline::{Pipeline, PipelineConfig, PipelineOutcome};
//! use gigastitch::provider::AsyncReqwestClient;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! let client = Arc::new(AsyncReqwestClient::new()?);
//! let pipeline = Pipeline::new(client, PipelineConfig::new("."));
//!
//! match pipeline.run(12345, 0, &CancellationToken::new()).await? {
//!     PipelineOutcome::Completed { artifact, .. } => println!("{}", artifact.display()),
//!     PipelineOutcome::Incomplete { acquisition, .. } => println!("{} missing", acquisition.missing()),
//! }
//! ```

pub mod acquisition;
pub mod assembly;
pub mod config;
pub mod grid;
pub mod layout;
pub mod logging;
pub mod metadata;
pub mod pipeline;
pub mod provider;
pub mod source;
pub mod store;

/// Version of the gigastitch library and CLI.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
