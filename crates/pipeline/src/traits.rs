//! Core traits for the recommendation pipeline.
//!
//! This module defines the Stage trait that every step of the pipeline
//! implements, so stages can be composed into a StagePipeline.

use async_trait::async_trait;
use shop_state::ShopState;

/// Core trait for pipeline stages.
///
/// All stages must implement this trait to be used in the StagePipeline.
///
/// ## Design Note
/// - Stages take ownership of the state and hand it back, writing only the
///   fields they own
/// - There is no error return: a stage that cannot do its work logs why and
///   writes an empty/default value, so the run always reaches the last stage
/// - Missing input from an earlier stage is a skip, not a failure
#[async_trait]
pub trait Stage: Send + Sync {
    /// Returns the name of this stage (for logging/debugging)
    fn name(&self) -> &str;

    /// Run this stage against the state.
    ///
    /// # Arguments
    /// * `state` - The shared record (takes ownership)
    ///
    /// # Returns
    /// The same record with this stage's output fields written
    async fn apply(&self, state: ShopState) -> ShopState;
}
