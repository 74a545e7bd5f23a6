//! Historical flatfile tile provider.
//!
//! Fetches encoded tile payloads from the archived `flatfile` endpoint.
//! Tiles are addressed by quadrant path rather than x/y/z, and each
//! asset name carries the protocol version and time code captured from
//! the era being reconstructed:
//!
//! `<url_base>&f1-<quadAddress>-<version>-<timeCode>`
//!
//! The returned bytes are still encoded; see [`crate::cipher`] for the
//! decoding transform. There is no authentication and no retry: any
//! non-success response is fatal to the caller's run.

use crate::provider::{AsyncHttpClient, ProviderError};
use crate::quadtree::QuadAddress;

/// Default archive endpoint.
pub const DEFAULT_URL_BASE: &str = "https://khmdb.google.com/flatfile?db=tm";

/// Historical flatfile tile provider.
///
/// Generic over the HTTP client so tests can substitute a mock.
pub struct FlatfileProvider<C: AsyncHttpClient> {
    http_client: C,
    url_base: String,
    version: String,
    time_code: String,
}

impl<C: AsyncHttpClient> FlatfileProvider<C> {
    /// Creates a provider against the default archive endpoint.
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client for making requests
    /// * `version` - Protocol version string captured from the archive
    /// * `time_code` - Session/time code captured from the archive
    pub fn new(http_client: C, version: impl Into<String>, time_code: impl Into<String>) -> Self {
        Self {
            http_client,
            url_base: DEFAULT_URL_BASE.to_string(),
            version: version.into(),
            time_code: time_code.into(),
        }
    }

    /// Overrides the endpoint base URL.
    pub fn with_url_base(mut self, url_base: impl Into<String>) -> Self {
        self.url_base = url_base.into();
        self
    }

    /// Returns the remote asset name for a tile address.
    ///
    /// Also used as the cache filename, so a cache entry is keyed by
    /// the full (address, version, time code) triple.
    pub fn asset_name(&self, address: &QuadAddress) -> String {
        format!("f1-{}-{}-{}", address, self.version, self.time_code)
    }

    /// Returns the full URL for an asset.
    pub fn tile_url(&self, asset_name: &str) -> String {
        format!("{}&{}", self.url_base, asset_name)
    }

    /// Fetches the still-encoded bytes for a tile address.
    pub async fn fetch_encoded(&self, address: &QuadAddress) -> Result<Vec<u8>, ProviderError> {
        let url = self.tile_url(&self.asset_name(address));
        self.http_client.get(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::tests::MockAsyncHttpClient;
    use crate::quadtree::address_for;

    fn provider(response: Result<Vec<u8>, ProviderError>) -> FlatfileProvider<MockAsyncHttpClient> {
        FlatfileProvider::new(MockAsyncHttpClient { response }, "i.342", "fc361")
    }

    #[test]
    fn test_asset_name_format() {
        let provider = provider(Ok(vec![]));
        let address = address_for(-33.457923889160156, 151.1445083618164, 20);

        assert_eq!(
            provider.asset_name(&address),
            "f1-012202011012213120030-i.342-fc361"
        );
    }

    #[test]
    fn test_tile_url_joins_with_ampersand() {
        let provider = provider(Ok(vec![]));
        assert_eq!(
            provider.tile_url("f1-0-i.342-fc361"),
            "https://khmdb.google.com/flatfile?db=tm&f1-0-i.342-fc361"
        );
    }

    #[test]
    fn test_with_url_base() {
        let provider = provider(Ok(vec![])).with_url_base("http://localhost:9999/flatfile?db=tm");
        assert!(provider
            .tile_url("f1-00-i.342-fc361")
            .starts_with("http://localhost:9999/"));
    }

    #[tokio::test]
    async fn test_fetch_encoded_returns_body() {
        let provider = provider(Ok(vec![9, 8, 7]));
        let address = address_for(0.0, 0.0, 2);

        let bytes = provider.fetch_encoded(&address).await.unwrap();
        assert_eq!(bytes, vec![9, 8, 7]);
    }

    #[tokio::test]
    async fn test_fetch_encoded_propagates_error() {
        let provider = provider(Err(ProviderError::HttpStatus {
            status: 500,
            url: "x".to_string(),
        }));
        let address = address_for(0.0, 0.0, 2);

        assert!(provider.fetch_encoded(&address).await.is_err());
    }
}
