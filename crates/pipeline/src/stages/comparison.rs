//! Stage that compares the extracted products and picks a winner.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use llm_client::{complete_json, LanguageModel};
use shop_state::{ProductComparison, ProductReview, ShopState};
use tracing::{error, info, warn};

use crate::prompts;
use crate::traits::Stage;

/// Writes `comparison` and `best_product`. One model call, no retry.
pub struct ComparisonStage {
    model: Arc<dyn LanguageModel>,
}

impl ComparisonStage {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    async fn compare(&self, products: &[ProductReview]) -> Result<ProductComparison> {
        let prompt = prompts::comparison_prompt(products)?;
        complete_json(self.model.as_ref(), &prompt)
            .await
            .context("Product comparison call failed")
    }
}

#[async_trait]
impl Stage for ComparisonStage {
    fn name(&self) -> &str {
        "comparison"
    }

    async fn apply(&self, mut state: ShopState) -> ShopState {
        if state.product_schema.is_empty() {
            info!("No product schema available; comparison skipped");
            return state;
        }

        match self.compare(&state.product_schema).await {
            Ok(report) => {
                if report.best_product.name.trim().is_empty() {
                    warn!("Comparison named no best product");
                }
                info!(
                    "Compared {} products; best product: {:?}",
                    report.comparisons.len(),
                    report.best_product.name
                );
                state.comparison = report.comparisons;
                state.best_product = Some(report.best_product);
            }
            Err(e) => {
                error!("Error during product comparison: {:#}", e);
                state.comparison = Vec::new();
                state.best_product = None;
            }
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use llm_client::MockLanguageModel;

    const REPORT: &str = r#"Here is the comparison:
```json
{
  "comparisons": [
    {
      "product_name": "Pixel 8 Pro",
      "specs_comparison": {"processor": "Tensor G3", "battery": "5050 mAh", "camera": "50 MP", "display": "6.7in OLED 120Hz", "storage": "128-1024GB"},
      "ratings_comparison": {"overall_rating": 4.7, "performance": 4.5, "battery_life": 4.3, "camera_quality": 4.9, "display_quality": 4.8},
      "reviews_summary": "Outstanding camera"
    },
    {
      "product_name": "iPhone 15",
      "specs_comparison": {"processor": "A16", "battery": "3349 mAh", "camera": "48 MP", "display": "6.1in OLED 60Hz", "storage": "128-512GB"},
      "ratings_comparison": {"overall_rating": 4.5, "performance": 4.6, "battery_life": 4.2, "camera_quality": 4.6, "display_quality": 4.4},
      "reviews_summary": "Polished and fast"
    }
  ],
  "best_product": {"product_name": "Pixel 8 Pro", "justification": "Best camera in its class"}
}
```"#;

    fn state_with_products() -> ShopState {
        let mut state = ShopState::new("best phones", "e@example.com");
        state.product_schema = vec![ProductReview::new("Pixel 8 Pro"), ProductReview::new("iPhone 15")];
        state
    }

    #[tokio::test]
    async fn test_comparison_sets_best_product() {
        let model = MockLanguageModel::new().with_response(REPORT);
        let stage = ComparisonStage::new(Arc::new(model.clone()));

        let state = stage.apply(state_with_products()).await;

        assert_eq!(state.comparison.len(), 2);
        assert_eq!(state.comparison[1].name, "iPhone 15");
        assert_eq!(state.comparison[0].ratings.camera_quality, 4.9);
        assert_eq!(state.best_product_name(), Some("Pixel 8 Pro"));
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_schema_passes_through() {
        let model = MockLanguageModel::new();
        let stage = ComparisonStage::new(Arc::new(model.clone()));
        let input = ShopState::new("q", "e@example.com");

        let state = stage.apply(input.clone()).await;

        assert_eq!(state, input);
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_failure_clears_only_comparison_fields() {
        let model = MockLanguageModel::new().with_response("not json at all");
        let stage = ComparisonStage::new(Arc::new(model.clone()));
        let input = state_with_products();

        let state = stage.apply(input.clone()).await;

        assert!(state.comparison.is_empty());
        assert!(state.best_product.is_none());
        assert_eq!(state.product_schema, input.product_schema);
        // No retry
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn test_sloppy_fields_keep_the_recommendation() {
        // A laptop has no camera spec, and the rating comes back as a string
        let reply = r#"{
            "comparisons": [
                {"product_name": "MacBook Air",
                 "specs_comparison": {"processor": "M3", "battery": "52.6Wh", "camera": null, "display": "13.6in", "storage": "256GB"},
                 "ratings_comparison": {"overall_rating": "4.5", "performance": 4.7, "battery_life": 4.9, "camera_quality": null, "display_quality": 4.5},
                 "reviews_summary": "Silent and fast"},
                {"product_name": "XPS 13",
                 "specs_comparison": {"processor": "Core Ultra 7", "battery": "55Wh", "camera": "1080p", "display": "13.4in", "storage": "512GB"},
                 "ratings_comparison": {"overall_rating": 4.3, "performance": 4.4, "battery_life": 4.1, "camera_quality": 3.8, "display_quality": 4.6},
                 "reviews_summary": null}
            ],
            "best_product": {"product_name": "MacBook Air", "justification": "All-day battery"}
        }"#;
        let model = MockLanguageModel::new().with_response(reply);
        let stage = ComparisonStage::new(Arc::new(model));

        let state = stage.apply(state_with_products()).await;

        assert_eq!(state.best_product_name(), Some("MacBook Air"));
        assert_eq!(state.comparison.len(), 2);
        assert_eq!(state.comparison[0].specs.camera, "");
        assert_eq!(state.comparison[0].ratings.overall, 4.5);
        assert_eq!(state.comparison[1].reviews_summary, "");
    }
}
