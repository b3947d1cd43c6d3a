//! Tile host URL construction.
//!
//! The host serves one KML description per panorama and one JPEG per
//! `(photo, level, row, col)`:
//!
//! ```text
//! {base_url}/gigapans/{photo_id}.kml
//! {base_url}/get_ge_tile/{photo_id}/{level}/{row}/{col}
//! ```

use crate::grid::TileCoord;

/// Default tile pyramid host.
pub const DEFAULT_BASE_URL: &str = "http://www.gigapan.org";

/// URL templates for a tile-pyramid host.
///
/// # Example
///
/// ```
/// use gigastitch::grid::TileCoord;
/// use gigastitch::source::GigapanSource;
///
/// let source = GigapanSource::default();
/// assert_eq!(
///     source.metadata_url(231697),
///     "http://www.gigapan.org/gigapans/231697.kml"
/// );
/// assert_eq!(
///     source.tile_url(231697, 4, TileCoord::new(3, 12)),
///     "http://www.gigapan.org/get_ge_tile/231697/4/3/12"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GigapanSource {
    base_url: String,
}

impl GigapanSource {
    /// Creates a source rooted at `base_url`. A trailing slash is ignored.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the panorama description document.
    pub fn metadata_url(&self, photo_id: u64) -> String {
        format!("{}/gigapans/{}.kml", self.base_url, photo_id)
    }

    /// URL of a single tile image.
    pub fn tile_url(&self, photo_id: u64, level: u32, coord: TileCoord) -> String {
        format!(
            "{}/get_ge_tile/{}/{}/{}/{}",
            self.base_url, photo_id, level, coord.row, coord.col
        )
    }
}

impl Default for GigapanSource {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
