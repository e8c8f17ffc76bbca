//! Sequential product recommendation pipeline.
//!
//! This crate provides:
//! - Stage trait and the six stage implementations
//! - StagePipeline for composing stages
//! - Prompt builders and the email template
//!
//! ## Architecture
//! One `ShopState` flows through the stages in a fixed order:
//! 1. Search finds a review article and fetches its text
//! 2. Extraction turns the text into product records (bounded retry)
//! 3. Comparison rates the products and picks the best one
//! 4. Video lookup finds a review video for the winner
//! 5. Presentation assembles the display view
//! 6. Notification emails the recommendation
//!
//! Stages never fail the run. A stage whose input is missing skips its work,
//! and one whose dependency fails logs the error and writes an empty value.
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{recommendation_pipeline, RetryPolicy, Services};
//!
//! let pipeline = recommendation_pipeline(&services, RetryPolicy::default());
//! let state = pipeline.run(ShopState::new(query, email)).await;
//! ```

use std::sync::Arc;

use llm_client::LanguageModel;
use providers::{Mailer, PageFetcher, SearchProvider, VideoSearch};

pub mod prompts;
pub mod stage_pipeline;
pub mod stages;
pub mod traits;

// Re-export main types
pub use stage_pipeline::StagePipeline;
pub use stages::{
    ComparisonStage, ExtractionStage, NotificationStage, PresentationStage, RetryPolicy,
    SearchStage, VideoLookupStage,
};
pub use traits::Stage;

/// External services the stages depend on.
#[derive(Clone)]
pub struct Services {
    pub search: Arc<dyn SearchProvider>,
    pub fetcher: Arc<dyn PageFetcher>,
    pub model: Arc<dyn LanguageModel>,
    pub videos: Arc<dyn VideoSearch>,
    pub mailer: Arc<dyn Mailer>,
}

/// Build the six-stage recommendation pipeline in its fixed order.
pub fn recommendation_pipeline(services: &Services, retry: RetryPolicy) -> StagePipeline {
    StagePipeline::new()
        .add_stage(SearchStage::new(services.search.clone(), services.fetcher.clone()))
        .add_stage(ExtractionStage::new(services.model.clone()).with_retry(retry))
        .add_stage(ComparisonStage::new(services.model.clone()))
        .add_stage(VideoLookupStage::new(services.videos.clone()))
        .add_stage(PresentationStage::new())
        .add_stage(NotificationStage::new(services.model.clone(), services.mailer.clone()))
}
