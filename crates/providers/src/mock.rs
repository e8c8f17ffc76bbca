//! Scripted provider implementations for tests.
//!
//! Each mock records the calls it receives so tests can assert both on the
//! resulting state and on which external calls happened.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::fetcher::PageFetcher;
use crate::mailer::{Mailer, OutgoingEmail};
use crate::search::{SearchHit, SearchProvider};
use crate::video::{VideoHit, VideoSearch};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn scripted_failure(service: &'static str, reason: &str) -> ProviderError {
    ProviderError::Network {
        service,
        reason: reason.to_string(),
    }
}

// =============================================================================
// Search
// =============================================================================

#[derive(Clone, Default)]
pub struct MockSearchProvider {
    hits: Arc<Mutex<Vec<SearchHit>>>,
    failure: Arc<Mutex<Option<String>>>,
    queries: Arc<Mutex<Vec<(String, usize)>>>,
}

impl MockSearchProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hit(self, title: &str, url: &str, score: f64) -> Self {
        lock(&self.hits).push(SearchHit {
            title: title.to_string(),
            url: url.to_string(),
            score,
        });
        self
    }

    pub fn failing(self, reason: &str) -> Self {
        *lock(&self.failure) = Some(reason.to_string());
        self
    }

    /// `(query, max_results)` for every call received.
    pub fn queries(&self) -> Vec<(String, usize)> {
        lock(&self.queries).clone()
    }
}

#[async_trait]
impl SearchProvider for MockSearchProvider {
    fn name(&self) -> &str {
        "mock search"
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        lock(&self.queries).push((query.to_string(), max_results));
        if let Some(reason) = lock(&self.failure).as_deref() {
            return Err(scripted_failure("mock search", reason));
        }
        Ok(lock(&self.hits).iter().take(max_results).cloned().collect())
    }
}

// =============================================================================
// Page Fetcher
// =============================================================================

/// Serves page text by URL; unknown URLs fail like an unreachable host.
#[derive(Clone, Default)]
pub struct MockPageFetcher {
    pages: Arc<Mutex<HashMap<String, String>>>,
    fetched: Arc<Mutex<Vec<String>>>,
}

impl MockPageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, url: &str, text: &str) -> Self {
        lock(&self.pages).insert(url.to_string(), text.to_string());
        self
    }

    pub fn fetched(&self) -> Vec<String> {
        lock(&self.fetched).clone()
    }
}

#[async_trait]
impl PageFetcher for MockPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        lock(&self.fetched).push(url.to_string());
        lock(&self.pages)
            .get(url)
            .cloned()
            .ok_or_else(|| scripted_failure("mock fetch", "no such page"))
    }
}

// =============================================================================
// Video Search
// =============================================================================

#[derive(Clone, Default)]
pub struct MockVideoSearch {
    hits: Arc<Mutex<Vec<VideoHit>>>,
    failure: Arc<Mutex<Option<String>>>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl MockVideoSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_video(self, video_id: &str, title: &str) -> Self {
        lock(&self.hits).push(VideoHit {
            video_id: video_id.to_string(),
            title: title.to_string(),
        });
        self
    }

    pub fn failing(self, reason: &str) -> Self {
        *lock(&self.failure) = Some(reason.to_string());
        self
    }

    pub fn queries(&self) -> Vec<String> {
        lock(&self.queries).clone()
    }
}

#[async_trait]
impl VideoSearch for MockVideoSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<VideoHit>> {
        lock(&self.queries).push(query.to_string());
        if let Some(reason) = lock(&self.failure).as_deref() {
            return Err(scripted_failure("mock video", reason));
        }
        Ok(lock(&self.hits).iter().take(max_results).cloned().collect())
    }
}

// =============================================================================
// Mailer
// =============================================================================

/// Records every email instead of sending it.
#[derive(Clone, Default)]
pub struct MockMailer {
    sent: Arc<Mutex<Vec<OutgoingEmail>>>,
    failure: Arc<Mutex<Option<String>>>,
    attempts: Arc<Mutex<usize>>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every message, like an SMTP server refusing the login.
    pub fn failing(self, reason: &str) -> Self {
        *lock(&self.failure) = Some(reason.to_string());
        self
    }

    /// Emails accepted so far.
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        lock(&self.sent).clone()
    }

    /// Calls to `send`, accepted or not.
    pub fn attempts(&self) -> usize {
        *lock(&self.attempts)
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<()> {
        *lock(&self.attempts) += 1;
        if let Some(reason) = lock(&self.failure).as_deref() {
            return Err(ProviderError::Mail(reason.to_string()));
        }
        lock(&self.sent).push(email);
        Ok(())
    }
}
