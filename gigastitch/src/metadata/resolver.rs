//! Metadata retrieval.

use super::parser::parse_metadata;
use super::types::{MetadataError, PanoramaMetadata};
use crate::provider::AsyncHttpClient;
use crate::source::GigapanSource;
use std::sync::Arc;
use tracing::{debug, info};

/// Fetches and parses the description document of a panorama.
///
/// No retry at this layer: a metadata failure ends the run before any tile
/// work starts.
pub struct MetadataResolver<C>
where
    C: AsyncHttpClient,
{
    client: Arc<C>,
    source: GigapanSource,
}

impl<C> MetadataResolver<C>
where
    C: AsyncHttpClient,
{
    /// Creates a resolver that fetches through `client` from `source`.
    pub fn new(client: Arc<C>, source: GigapanSource) -> Self {
        Self { client, source }
    }

    /// Fetches the metadata of `photo_id`.
    ///
    /// # Errors
    ///
    /// [`MetadataError::Fetch`] for transport failures, any other variant
    /// for documents that cannot be interpreted.
    pub async fn resolve(&self, photo_id: u64) -> Result<PanoramaMetadata, MetadataError> {
        let url = self.source.metadata_url(photo_id);
        debug!(photo_id, url = %url, "Fetching panorama metadata");

        let body = self
            .client
            .get(&url)
            .await
            .map_err(|source| MetadataError::Fetch { photo_id, source })?;

        let document = String::from_utf8(body)
            .map_err(|e| MetadataError::Parse(format!("document is not UTF-8: {}", e)))?;

        let metadata = parse_metadata(&document)?;

        info!(
            photo_id,
            max_width = metadata.max_width,
            max_height = metadata.max_height,
            tile_size = metadata.tile_size,
            "Panorama metadata resolved"
        );

        Ok(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{MockAsyncHttpClient, ProviderError};

    fn resolver(response: Result<Vec<u8>, ProviderError>) -> MetadataResolver<MockAsyncHttpClient> {
        MetadataResolver::new(
            Arc::new(MockAsyncHttpClient { response }),
            GigapanSource::default(),
        )
    }

    #[tokio::test]
    async fn test_resolve_success() {
        let doc = b"<kml><maxWidth>4000</maxWidth><maxHeight>3000</maxHeight><tileSize>256</tileSize></kml>";
        let metadata = resolver(Ok(doc.to_vec())).resolve(42).await.unwrap();
        assert_eq!(metadata.max_width, 4000);
        assert_eq!(metadata.max_height, 3000);
        assert_eq!(metadata.tile_size, 256);
    }

    #[tokio::test]
    async fn test_resolve_fetch_failure() {
        let response = Err(ProviderError::HttpStatus {
            status: 404,
            url: "http://www.gigapan.org/gigapans/42.kml".to_string(),
        });
        let err = resolver(response).resolve(42).await.unwrap_err();
        assert!(matches!(err, MetadataError::Fetch { photo_id: 42, .. }));
        assert!(err.to_string().contains("photo 42"));
    }

    #[tokio::test]
    async fn test_resolve_non_utf8_body() {
        let err = resolver(Ok(vec![0xff, 0xfe, 0x00]))
            .resolve(1)
            .await
            .unwrap_err();
        assert!(matches!(err, MetadataError::Parse(_)));
    }
}
