use std::time::Duration;

use moka::sync::Cache;
use reqwest::Client as HttpClient;

use crate::error::{AppError, AppResult};
use crate::models::TmdbMovieDetails;

/// Bound on (external_id, api_key) poster results kept in memory
const POSTER_CACHE_CAPACITY: u64 = 4096;

/// Poster metadata provider abstraction
///
/// Maps an external movie identifier plus credential to a displayable
/// image URL. Lookups are strictly best-effort: a provider returns `None`
/// for unknown ids, missing credentials, and any transport or parse
/// failure, and never surfaces an error to the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PosterProvider: Send + Sync {
    async fn resolve(&self, external_id: i64, api_key: &str) -> Option<String>;
}

/// TMDB-backed poster provider
///
/// One bounded-timeout GET per uncached lookup; results (including
/// misses) are memoized per `(external_id, api_key)`.
pub struct TmdbPosterProvider {
    http_client: HttpClient,
    api_url: String,
    image_base_url: String,
    cache: Cache<(i64, String), Option<String>>,
}

impl TmdbPosterProvider {
    pub fn new(api_url: String, image_base_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_url,
            image_base_url,
            cache: Cache::new(POSTER_CACHE_CAPACITY),
        })
    }

    /// Fetches the poster path for a movie from the metadata endpoint
    async fn fetch_poster_path(&self, external_id: i64, api_key: &str) -> AppResult<Option<String>> {
        let url = format!("{}/movie/{}", self.api_url, external_id);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", api_key), ("language", "en-US")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "metadata endpoint returned status {}",
                response.status()
            )));
        }

        let details: TmdbMovieDetails = response.json().await?;
        Ok(details.poster_path)
    }

    /// Joins the CDN base with a poster path
    fn image_url(&self, poster_path: &str) -> String {
        format!("{}{}", self.image_base_url, poster_path)
    }
}

#[async_trait::async_trait]
impl PosterProvider for TmdbPosterProvider {
    async fn resolve(&self, external_id: i64, api_key: &str) -> Option<String> {
        // Unknown id or missing credential: skip the lookup entirely.
        if external_id < 0 || api_key.is_empty() {
            return None;
        }

        let key = (external_id, api_key.to_owned());
        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!(external_id, "Poster cache hit");
            return hit;
        }

        let url = match self.fetch_poster_path(external_id, api_key).await {
            Ok(Some(path)) => Some(self.image_url(&path)),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(external_id, error = %e, "Poster lookup failed");
                None
            }
        };

        self.cache.insert(key, url.clone());
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UNKNOWN_EXTERNAL_ID;

    /// An endpoint nothing listens on; any request against it errors out.
    fn unreachable_provider() -> TmdbPosterProvider {
        TmdbPosterProvider::new(
            "http://127.0.0.1:1".to_string(),
            "https://image.tmdb.org/t/p/w500".to_string(),
            Duration::from_millis(200),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_sentinel_id_short_circuits() {
        let provider = unreachable_provider();
        // Returns before any network attempt, so the dead endpoint and the
        // sub-second timeout never come into play.
        assert_eq!(provider.resolve(UNKNOWN_EXTERNAL_ID, "some-key").await, None);
    }

    #[tokio::test]
    async fn test_empty_credential_short_circuits() {
        let provider = unreachable_provider();
        assert_eq!(provider.resolve(27205, "").await, None);
    }

    #[tokio::test]
    async fn test_transport_failure_degrades_to_none() {
        let provider = unreachable_provider();
        assert_eq!(provider.resolve(27205, "some-key").await, None);
    }

    #[test]
    fn test_image_url_joins_cdn_base_and_path() {
        let provider = unreachable_provider();
        assert_eq!(
            provider.image_url("/edv5CZvWj09upOsy2Y6IwDhK8bt.jpg"),
            "https://image.tmdb.org/t/p/w500/edv5CZvWj09upOsy2Y6IwDhK8bt.jpg"
        );
    }
}
