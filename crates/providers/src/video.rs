//! Video search: find a review video for the recommended product.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ensure_success, network, ProviderError, Result};

const SERVICE: &str = "YouTube";

pub const YOUTUBE_SEARCH_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/search";

/// One video search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoHit {
    pub video_id: String,
    pub title: String,
}

impl VideoHit {
    /// Canonical watch URL for this video.
    pub fn watch_url(&self) -> String {
        watch_url(&self.video_id)
    }
}

/// Canonical YouTube watch URL for a video id.
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

/// Video search provider.
#[async_trait]
pub trait VideoSearch: Send + Sync {
    /// Search for videos matching `query`, returning at most `max_results`.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<VideoHit>>;
}

// =============================================================================
// YouTube Data API v3
// =============================================================================

#[derive(Debug, Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    #[serde(default)]
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId", default)]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    #[serde(default)]
    title: String,
}

impl From<SearchListResponse> for Vec<VideoHit> {
    fn from(response: SearchListResponse) -> Self {
        // Channels and playlists carry no videoId; skip them
        response
            .items
            .into_iter()
            .filter_map(|item| {
                let video_id = item.id.video_id.filter(|id| !id.is_empty())?;
                Some(VideoHit {
                    video_id,
                    title: item.snippet.map(|s| s.title).unwrap_or_default(),
                })
            })
            .collect()
    }
}

/// Client for the YouTube Data API `search.list` call.
#[derive(Clone)]
pub struct YouTubeClient {
    api_key: String,
    client: Client,
    endpoint: String,
}

impl YouTubeClient {
    pub fn new(api_key: impl Into<String>, client: Client) -> Self {
        Self {
            api_key: api_key.into(),
            client,
            endpoint: YOUTUBE_SEARCH_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl VideoSearch for YouTubeClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<VideoHit>> {
        let max_results = max_results.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("q", query),
                ("maxResults", max_results.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(network(SERVICE))?;
        let response = ensure_success(SERVICE, response).await?;

        let body: SearchListResponse = response.json().await.map_err(|e| ProviderError::Parse {
            service: SERVICE,
            reason: e.to_string(),
        })?;

        let hits: Vec<VideoHit> = body.into();
        debug!("YouTube returned {} videos for {:?}", hits.len(), query);
        Ok(hits)
    }
}
