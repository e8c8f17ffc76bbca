//! Stage that assembles the display-ready view. Makes no external calls.

use async_trait::async_trait;
use shop_state::{RecommendationView, ShopState};
use tracing::{info, warn};

use crate::traits::Stage;

/// Writes `view`; identity when there is no comparison.
#[derive(Debug, Default, Clone, Copy)]
pub struct PresentationStage;

impl PresentationStage {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Stage for PresentationStage {
    fn name(&self) -> &str {
        "presentation"
    }

    async fn apply(&self, mut state: ShopState) -> ShopState {
        if state.comparison.is_empty() {
            warn!("Comparison not available; nothing to display");
            return state;
        }

        state.view = Some(RecommendationView {
            products: state.product_schema.clone(),
            best_product: state.best_product.clone(),
            comparison: state.comparison.clone(),
            youtube_link: state.youtube_link.clone(),
        });
        info!(
            "Prepared recommendation view with {} compared product(s)",
            state.comparison.len()
        );
        state
    }
}
