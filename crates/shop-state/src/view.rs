//! Display-ready projection of a finished run.

use serde::{Deserialize, Serialize};

use crate::products::{BestProduct, ComparisonEntry, ProductReview};

/// What a front end shows: the products, the comparison, the winner and its
/// review video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationView {
    pub products: Vec<ProductReview>,
    pub best_product: Option<BestProduct>,
    pub comparison: Vec<ComparisonEntry>,
    pub youtube_link: Option<String>,
}
