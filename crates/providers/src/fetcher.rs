//! Page fetching: download an article and reduce it to plain text.
//!
//! The text is what the extraction prompt embeds, so markup, scripts and
//! styles are dropped and whitespace is collapsed to single spaces.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Node};
use tracing::debug;

use crate::error::{ensure_success, network, ProviderError, Result};

const SERVICE: &str = "page fetch";

/// Browser-like User-Agent; many review sites refuse obvious bots.
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Elements whose text never belongs in the article body.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head", "svg"];

/// Downloads a page and returns its visible text.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// `PageFetcher` over plain HTTP GET. No JavaScript rendering.
#[derive(Clone)]
pub struct WebPageFetcher {
    client: Client,
}

impl WebPageFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build the HTTP client the fetcher (and the API clients) share.
    pub fn build_http_client(timeout: Duration) -> Result<Client> {
        Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| ProviderError::Config {
                service: "HTTP client",
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl PageFetcher for WebPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(network(SERVICE))?;
        let response = ensure_success(SERVICE, response).await?;

        let html = response.text().await.map_err(network(SERVICE))?;
        let text = html_to_text(&html);
        debug!("Fetched {} ({} bytes html, {} chars text)", url, html.len(), text.len());
        Ok(text)
    }
}

/// Visible text of an HTML document, space-separated and stripped.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut parts: Vec<&str> = Vec::new();

    for node in document.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| SKIPPED_ELEMENTS.contains(&el.name()))
        });
        if hidden {
            continue;
        }
        parts.extend(text.split_whitespace());
    }

    parts.join(" ")
}
