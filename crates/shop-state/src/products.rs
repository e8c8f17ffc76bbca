//! Product records produced and consumed by the language-model stages.
//!
//! Every type here doubles as a model-facing JSON shape: the extraction and
//! comparison prompts embed the JSON Schema generated from these types, and the
//! model's reply is deserialized straight back into them. Field names on the
//! Rust side follow the state record; `#[serde(rename)]` keeps the wire names
//! the prompts ask for.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

// =============================================================================
// Extraction Output
// =============================================================================

/// One product pulled out of a review article.
///
/// Models are sloppy about optional fields (`null`, missing keys, numbers as
/// strings), so everything except `title` deserializes leniently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProductReview {
    /// The product name
    pub title: String,

    /// Link to the article or product page
    #[serde(default)]
    pub url: Option<String>,

    /// Concise summary of the product's main features or purpose
    #[serde(default, alias = "content")]
    pub summary: Option<String>,

    /// Positive aspects of the product
    #[serde(default, deserialize_with = "null_as_default")]
    pub pros: Vec<String>,

    /// Negative aspects of the product
    #[serde(default, deserialize_with = "null_as_default")]
    pub cons: Vec<String>,

    /// Notable features or specifications, keyed by feature name
    #[serde(default, deserialize_with = "null_as_default")]
    pub highlights: BTreeMap<String, serde_json::Value>,

    /// Numerical rating if the article gives one, otherwise 0.0
    #[serde(default, deserialize_with = "lenient_score")]
    pub score: f32,
}

impl ProductReview {
    /// Create a product with only a title; everything else defaulted.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: None,
            summary: None,
            pros: Vec::new(),
            cons: Vec::new(),
            highlights: BTreeMap::new(),
            score: 0.0,
        }
    }
}

/// Envelope the extraction prompt asks the model to return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProductList {
    /// Every product mentioned in the supplied articles
    #[serde(default, deserialize_with = "skip_malformed")]
    pub products: Vec<ProductReview>,
}

// =============================================================================
// Comparison Output
// =============================================================================

/// Fixed spec fields every product is compared on.
///
/// Not every category has every field (a laptop review has no meaningful
/// `camera`), so `null` or a missing key reads as an empty string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpecsComparison {
    /// Processor type and model, e.g. "Snapdragon 888"
    #[serde(default, deserialize_with = "null_as_default")]
    pub processor: String,
    /// Battery capacity and type, e.g. "4500mAh"
    #[serde(default, deserialize_with = "null_as_default")]
    pub battery: String,
    /// Camera specs, e.g. "108MP primary"
    #[serde(default, deserialize_with = "null_as_default")]
    pub camera: String,
    /// Display type, size and refresh rate, e.g. "6.5 inch OLED, 120Hz"
    #[serde(default, deserialize_with = "null_as_default")]
    pub display: String,
    /// Storage options and expandability, e.g. "128GB, expandable"
    #[serde(default, deserialize_with = "null_as_default")]
    pub storage: String,
}

/// Fixed ratings, each out of 5. Numeric strings are accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RatingsComparison {
    /// Overall rating out of 5, e.g. 4.5
    #[serde(
        rename = "overall_rating",
        alias = "overall",
        default,
        deserialize_with = "lenient_score"
    )]
    pub overall: f32,
    /// Performance rating out of 5
    #[serde(default, deserialize_with = "lenient_score")]
    pub performance: f32,
    /// Battery life rating out of 5
    #[serde(default, deserialize_with = "lenient_score")]
    pub battery_life: f32,
    /// Camera quality rating out of 5
    #[serde(default, deserialize_with = "lenient_score")]
    pub camera_quality: f32,
    /// Display quality rating out of 5
    #[serde(default, deserialize_with = "lenient_score")]
    pub display_quality: f32,
}

/// Comparison of one product on the fixed spec and rating fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ComparisonEntry {
    /// Name of the product
    #[serde(rename = "product_name", alias = "name")]
    pub name: String,

    #[serde(
        rename = "specs_comparison",
        alias = "specs",
        default,
        deserialize_with = "null_as_default"
    )]
    pub specs: SpecsComparison,

    #[serde(
        rename = "ratings_comparison",
        alias = "ratings",
        default,
        deserialize_with = "null_as_default"
    )]
    pub ratings: RatingsComparison,

    /// Summary of key points from user reviews about this product
    #[serde(default, deserialize_with = "null_as_default")]
    pub reviews_summary: String,
}

/// The single product picked as the recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BestProduct {
    /// Name of the best product
    #[serde(rename = "product_name", alias = "name")]
    pub name: String,

    /// Why this product is the best choice
    #[serde(default, deserialize_with = "null_as_default")]
    pub justification: String,
}

impl BestProduct {
    pub fn new(name: impl Into<String>, justification: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            justification: justification.into(),
        }
    }
}

/// Envelope the comparison prompt asks the model to return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProductComparison {
    #[serde(deserialize_with = "skip_malformed")]
    pub comparisons: Vec<ComparisonEntry>,
    pub best_product: BestProduct,
}

// =============================================================================
// Lenient Deserializers
// =============================================================================

/// Treat an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize a list entry by entry, dropping the ones that do not fit `T`.
///
/// `null` reads as an empty list.
fn skip_malformed<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let entries = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
    let total = entries.len();
    let kept: Vec<T> = entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("Dropping malformed entry from model output: {}", e);
                None
            }
        })
        .collect();
    if kept.len() < total {
        debug!("Kept {} of {} entries", kept.len(), total);
    }
    Ok(kept)
}

/// Accept a number, a numeric string or null; anything else scores 0.0.
fn lenient_score<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let score = match value {
        Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0) as f32,
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(score)
}
