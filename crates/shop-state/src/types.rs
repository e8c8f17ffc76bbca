//! The shared state record threaded through every pipeline stage.
//!
//! One `ShopState` lives for exactly one run. Each field is written by a single
//! stage and read only by stages that run after it:
//!
//! | field            | written by   | read by                    |
//! |------------------|--------------|----------------------------|
//! | `blogs_content`  | search       | extraction                 |
//! | `product_schema` | extraction   | comparison, presentation   |
//! | `comparison`     | comparison   | presentation               |
//! | `best_product`   | comparison   | video, presentation, notify|
//! | `youtube_link`   | video        | presentation, notify       |
//! | `view`           | presentation | caller                     |
//! | `notification`   | notify       | caller                     |

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::products::{BestProduct, ComparisonEntry, ProductReview};
use crate::view::RecommendationView;

// =============================================================================
// Search Output
// =============================================================================

/// An article found by the web search, with its fetched page text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogContent {
    pub title: String,
    pub url: String,
    /// Plain page text; empty when the page could not be fetched
    pub text: String,
    /// Relevance score reported by the search provider
    pub relevance_score: f64,
}

// =============================================================================
// Notification Types
// =============================================================================

/// Email copy the notification prompt asks the model to write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EmailCopy {
    /// The email subject line, designed to capture the recipient's attention
    pub subject: String,
    /// The main heading of the email, introducing the recommended product
    pub heading: String,
    /// A concise explanation of why the product is being recommended
    pub justification_line: String,
}

/// Record of a recommendation email accepted by the mail transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentNotification {
    pub recipient: String,
    pub subject: String,
}

// =============================================================================
// ShopState
// =============================================================================

/// The single record every stage takes by value and hands back.
///
/// `query` and `email` are fixed at construction and only exposed through
/// accessors; all other fields start empty and are filled as stages run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShopState {
    query: String,
    email: String,
    pub blogs_content: Vec<BlogContent>,
    pub product_schema: Vec<ProductReview>,
    pub comparison: Vec<ComparisonEntry>,
    pub best_product: Option<BestProduct>,
    pub youtube_link: Option<String>,
    pub view: Option<RecommendationView>,
    pub notification: Option<SentNotification>,
}

impl ShopState {
    /// Start a run for `query`, to be reported to `email`.
    pub fn new(query: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            email: email.into(),
            blogs_content: Vec::new(),
            product_schema: Vec::new(),
            comparison: Vec::new(),
            best_product: None,
            youtube_link: None,
            view: None,
            notification: None,
        }
    }

    /// The shopping query this run was started with.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The address the recommendation goes to.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Name of the chosen product, if the comparison stage picked one.
    pub fn best_product_name(&self) -> Option<&str> {
        self.best_product
            .as_ref()
            .map(|best| best.name.as_str())
            .filter(|name| !name.trim().is_empty())
    }

    /// True when no stage managed to produce a recommendation.
    pub fn is_degraded(&self) -> bool {
        self.best_product_name().is_none()
    }
}
