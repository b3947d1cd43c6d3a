//! CLI command implementations.
//!
//! - [`stitch`] - Download and stitch one panorama

pub mod common;
pub mod stitch;
