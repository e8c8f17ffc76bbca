//! Stage that finds a review article for the query.
//!
//! Runs one web search and fetches the page text of each hit. Fails soft:
//! a search error or an empty result leaves `blogs_content` empty, and a page
//! that cannot be fetched keeps its entry with empty text.

use std::sync::Arc;

use async_trait::async_trait;
use providers::{PageFetcher, SearchProvider};
use shop_state::{BlogContent, ShopState};
use tracing::{error, info, warn};

use crate::traits::Stage;

/// Only the top search result is used.
const MAX_RESULTS: usize = 1;

/// Writes `blogs_content`.
pub struct SearchStage {
    search: Arc<dyn SearchProvider>,
    fetcher: Arc<dyn PageFetcher>,
}

impl SearchStage {
    pub fn new(search: Arc<dyn SearchProvider>, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { search, fetcher }
    }
}

#[async_trait]
impl Stage for SearchStage {
    fn name(&self) -> &str {
        "search"
    }

    async fn apply(&self, mut state: ShopState) -> ShopState {
        let result = self.search.search(state.query(), MAX_RESULTS).await;
        let hits = match result {
            Ok(hits) if !hits.is_empty() => hits,
            Ok(_) => {
                warn!("No search results found for query {:?}", state.query());
                state.blogs_content = Vec::new();
                return state;
            }
            Err(e) => {
                error!("Error with {} search call: {}", self.search.name(), e);
                state.blogs_content = Vec::new();
                return state;
            }
        };

        let mut blogs_content = Vec::with_capacity(hits.len());
        for hit in hits {
            if hit.url.trim().is_empty() {
                warn!("Dropping search result without URL: {:?}", hit.title);
                continue;
            }

            let text = match self.fetcher.fetch(&hit.url).await {
                Ok(text) => text,
                Err(e) => {
                    warn!("Error loading page content from {}: {}", hit.url, e);
                    String::new()
                }
            };

            blogs_content.push(BlogContent {
                title: hit.title,
                url: hit.url,
                text,
                relevance_score: hit.score,
            });
        }

        info!(
            "Search stage collected {} article(s) ({} with text)",
            blogs_content.len(),
            blogs_content.iter().filter(|b| !b.text.is_empty()).count()
        );
        state.blogs_content = blogs_content;
        state
    }
}
