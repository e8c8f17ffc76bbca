//! The StagePipeline runs stages in a fixed order.
//!
//! This module provides the main StagePipeline struct that chains
//! stages together using the builder pattern.

use std::time::Instant;

use shop_state::ShopState;
use tracing;

use crate::traits::Stage;

/// Chains stages together into a strictly sequential pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = StagePipeline::new()
///     .add_stage(SearchStage::new(search, fetcher))
///     .add_stage(ExtractionStage::new(model.clone()))
///     .add_stage(ComparisonStage::new(model));
///
/// let state = pipeline.run(ShopState::new(query, email)).await;
/// ```
pub struct StagePipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl StagePipeline {
    /// Create a new empty StagePipeline.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Add a stage to the end of the pipeline (builder pattern).
    pub fn add_stage(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run every stage in order, each one to completion before the next.
    ///
    /// ## Algorithm
    /// 1. Start with the input state
    /// 2. For each stage in order:
    ///    a. Log stage name
    ///    b. Apply the stage
    ///    c. Log elapsed time
    /// 3. Return the final state
    pub async fn run(&self, state: ShopState) -> ShopState {
        let mut current = state;
        for (position, stage) in self.stages.iter().enumerate() {
            let started = Instant::now();
            tracing::debug!(
                "Running stage {}/{}: {}",
                position + 1,
                self.stages.len(),
                stage.name()
            );
            current = stage.apply(current).await;
            tracing::debug!(
                "Stage finished: {} ({:.2?})",
                stage.name(),
                started.elapsed()
            );
        }
        current
    }
}

impl Default for StagePipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Appends its name to a shared log and to the link field.
    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    #[async_trait]
    impl Stage for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        async fn apply(&self, mut state: ShopState) -> ShopState {
            self.log.lock().unwrap().push(self.name);
            let link = state.youtube_link.take().unwrap_or_default();
            state.youtube_link = Some(format!("{link}{}", self.name));
            state
        }
    }

    #[tokio::test]
    async fn test_empty_pipeline() {
        let pipeline = StagePipeline::new();
        let state = ShopState::new("q", "e@example.com");

        let result = pipeline.run(state.clone()).await;
        assert_eq!(result, state);
        assert!(pipeline.is_empty());
    }

    #[tokio::test]
    async fn test_stages_run_in_insertion_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let pipeline = StagePipeline::new()
            .add_stage(Recorder { name: "a", log: log.clone() })
            .add_stage(Recorder { name: "b", log: log.clone() })
            .add_stage(Recorder { name: "c", log: log.clone() });

        let result = pipeline.run(ShopState::new("q", "e@example.com")).await;

        assert_eq!(*log.lock().unwrap(), vec!["a", "b", "c"]);
        assert_eq!(result.youtube_link.as_deref(), Some("abc"));
        assert_eq!(pipeline.stage_names(), vec!["a", "b", "c"]);
        assert_eq!(pipeline.len(), 3);
    }
}
