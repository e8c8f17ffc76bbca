//! Web search: find review articles for a shopping query.
//!
//! `TavilyClient` talks to Tavily's search API. Only the hit metadata is used
//! here; page text comes from a `PageFetcher`, not from Tavily's snippet.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ensure_success, network, ProviderError, Result};

const SERVICE: &str = "Tavily";

pub const TAVILY_ENDPOINT: &str = "https://api.tavily.com/search";

/// One search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    /// Relevance score reported by the provider
    pub score: f64,
}

/// Web search provider.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Returns the name of this provider (for logging/debugging)
    fn name(&self) -> &str;

    /// Search the web for `query`, returning at most `max_results` hits.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>>;
}

// =============================================================================
// Tavily
// =============================================================================

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    score: f64,
}

impl From<TavilyResponse> for Vec<SearchHit> {
    fn from(response: TavilyResponse) -> Self {
        response
            .results
            .into_iter()
            .map(|r| SearchHit {
                title: r.title,
                url: r.url,
                score: r.score,
            })
            .collect()
    }
}

/// Tavily API client for web search
#[derive(Clone)]
pub struct TavilyClient {
    api_key: String,
    client: Client,
    endpoint: String,
}

impl TavilyClient {
    pub fn new(api_key: impl Into<String>, client: Client) -> Self {
        Self {
            api_key: api_key.into(),
            client,
            endpoint: TAVILY_ENDPOINT.to_string(),
        }
    }

    /// Point the client at a different endpoint (proxies, test servers).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl SearchProvider for TavilyClient {
    fn name(&self) -> &str {
        SERVICE
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        let request = TavilyRequest {
            api_key: &self.api_key,
            query,
            max_results,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(network(SERVICE))?;
        let response = ensure_success(SERVICE, response).await?;

        let body: TavilyResponse = response.json().await.map_err(|e| ProviderError::Parse {
            service: SERVICE,
            reason: e.to_string(),
        })?;

        let hits: Vec<SearchHit> = body.into();
        debug!("Tavily returned {} results for {:?}", hits.len(), query);
        Ok(hits)
    }
}
