//! Stage implementations for the recommendation pipeline.
//!
//! This module contains the six concrete stages, in the order they run
//! in a StagePipeline.

pub mod search;
pub mod extraction;
pub mod comparison;
pub mod video;
pub mod presentation;
pub mod notification;

// Re-export for convenience
pub use search::SearchStage;
pub use extraction::{ExtractionStage, RetryPolicy};
pub use comparison::ComparisonStage;
pub use video::VideoLookupStage;
pub use presentation::PresentationStage;
pub use notification::NotificationStage;
