use async_trait::async_trait;
use reqwest::Client;
use shared::domain::Photo;
use tracing::debug;
use url::Url;

use crate::error::FetchError;

pub const DEFAULT_LIST_ENDPOINT: &str = "https://picsum.photos/v2/list";

#[async_trait]
pub trait PhotoSource: Send + Sync {
    async fn fetch_photos(&self) -> Result<Vec<Photo>, FetchError>;
}

/// Reads the photo listing with a single unauthenticated GET.
pub struct HttpPhotoSource {
    http: Client,
    endpoint: String,
}

impl HttpPhotoSource {
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_LIST_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(http: Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Default for HttpPhotoSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PhotoSource for HttpPhotoSource {
    async fn fetch_photos(&self) -> Result<Vec<Photo>, FetchError> {
        let url = Url::parse(&self.endpoint).map_err(FetchError::InvalidUrl)?;

        let res = self.http.get(url).send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::InvalidResponse {
                status: status.as_u16(),
            });
        }

        let body = res.bytes().await?;
        let photos: Vec<Photo> = serde_json::from_slice(&body).map_err(FetchError::Decoding)?;
        debug!(
            endpoint = %self.endpoint,
            count = photos.len(),
            "fetched photo listing"
        );
        Ok(photos)
    }
}

#[cfg(test)]
#[path = "tests/network_tests.rs"]
mod tests;
