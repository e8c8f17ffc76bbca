//! Stage that turns article text into structured product records.
//!
//! ## Algorithm
//! 1. Skip if the search stage found nothing
//! 2. Build one prompt embedding every article
//! 3. Ask the model; accept only if more than one product comes back
//! 4. Otherwise wait `retry.delay` and try again, up to `retry.max_attempts`
//! 5. Give up with an empty schema

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use llm_client::{complete_json, LanguageModel};
use shop_state::{ProductList, ProductReview, ShopState};
use tracing::{info, warn};

use crate::prompts;
use crate::traits::Stage;

/// Minimum number of products for an extraction to count as usable.
const MIN_PRODUCTS: usize = 2;

/// Bounded retry with a fixed delay between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: usize,
    /// Pause between attempts; never applied after the last one
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Same attempt count, no waiting. Used by tests.
    pub fn immediate(max_attempts: usize) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(2, Duration::from_secs(60))
    }
}

/// Writes `product_schema`.
pub struct ExtractionStage {
    model: Arc<dyn LanguageModel>,
    retry: RetryPolicy,
}

impl ExtractionStage {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self {
            model,
            retry: RetryPolicy::default(),
        }
    }

    /// Configure the retry policy (default: 2 attempts, 60s apart)
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = RetryPolicy::new(retry.max_attempts, retry.delay);
        self
    }

    /// One model call, parsed into a product list.
    async fn attempt(&self, prompt: &str) -> Result<Vec<ProductReview>> {
        let list: ProductList = complete_json(self.model.as_ref(), prompt)
            .await
            .context("Product extraction call failed")?;
        Ok(list.products)
    }
}

#[async_trait]
impl Stage for ExtractionStage {
    fn name(&self) -> &str {
        "extraction"
    }

    async fn apply(&self, mut state: ShopState) -> ShopState {
        if state.blogs_content.is_empty() {
            info!("No blog content available; schema extraction skipped");
            state.product_schema = Vec::new();
            return state;
        }

        let prompt = match prompts::extraction_prompt(&state.blogs_content) {
            Ok(prompt) => prompt,
            Err(e) => {
                warn!("Could not build extraction prompt: {:#}", e);
                state.product_schema = Vec::new();
                return state;
            }
        };

        for attempt in 1..=self.retry.max_attempts {
            match self.attempt(&prompt).await {
                Ok(products) if products.len() >= MIN_PRODUCTS => {
                    info!(
                        "Extracted {} products on attempt {}",
                        products.len(),
                        attempt
                    );
                    state.product_schema = products;
                    return state;
                }
                Ok(products) => warn!(
                    "Attempt {} failed: product schema has {} product(s), need at least {}",
                    attempt,
                    products.len(),
                    MIN_PRODUCTS
                ),
                Err(e) => warn!("Attempt {} error: {:#}", attempt, e),
            }

            if attempt < self.retry.max_attempts {
                tokio::time::sleep(self.retry.delay).await;
            }
        }

        warn!(
            "All {} attempts failed to produce more than one product",
            self.retry.max_attempts
        );
        state.product_schema = Vec::new();
        state
    }
}
