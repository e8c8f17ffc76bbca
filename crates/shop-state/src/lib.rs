//! # Shop State Crate
//!
//! Domain types shared by every crate in the workspace.
//!
//! ## Main Components
//!
//! - **types**: `ShopState`, the record threaded through the pipeline, plus
//!   search and notification records
//! - **products**: product, comparison and best-product records, which are
//!   also the JSON shapes the language model is asked to produce
//! - **view**: the display bundle built by the presentation stage
//!
//! ## Example Usage
//!
//! ```ignore
//! use shop_state::ShopState;
//!
//! let state = ShopState::new("best smartphones under $1000", "me@example.com");
//! assert!(state.is_degraded());
//! ```

// Public modules
pub mod products;
pub mod types;
pub mod view;

// Re-export commonly used types for convenience
pub use products::{
    BestProduct,
    ComparisonEntry,
    ProductComparison,
    ProductList,
    ProductReview,
    RatingsComparison,
    SpecsComparison,
};
pub use types::{BlogContent, EmailCopy, SentNotification, ShopState};
pub use view::RecommendationView;
