//! Integration tests for the pipeline.
//!
//! These tests run the full six-stage pipeline against scripted services
//! and check the final state and the calls each service received.

use llm_client::MockLanguageModel;
use pipeline::{recommendation_pipeline, PresentationStage, RetryPolicy, Services, Stage};
use providers::{MockMailer, MockPageFetcher, MockSearchProvider, MockVideoSearch};
use shop_state::{BestProduct, ProductReview, ShopState};
use std::sync::Arc;

const QUERY: &str = "best smartphones under $1000";
const EMAIL: &str = "shopper@example.com";
const ARTICLE_URL: &str = "https://example.com/best-phones-2024";

struct Harness {
    search: MockSearchProvider,
    fetcher: MockPageFetcher,
    model: MockLanguageModel,
    videos: MockVideoSearch,
    mailer: MockMailer,
}

impl Harness {
    fn new(model: MockLanguageModel) -> Self {
        Self {
            search: MockSearchProvider::new().with_hit("The best phones of 2024", ARTICLE_URL, 0.93),
            fetcher: MockPageFetcher::new().with_page(
                ARTICLE_URL,
                "Google Pixel 8 Pro: best camera. Apple iPhone 15: smooth and fast. \
                 Samsung Galaxy S24: bright display.",
            ),
            model,
            videos: MockVideoSearch::new().with_video("pX8pRoVid", "Pixel 8 Pro review"),
            mailer: MockMailer::new(),
        }
    }

    fn without_search_results(mut self) -> Self {
        self.search = MockSearchProvider::new();
        self
    }

    async fn run(&self) -> ShopState {
        let services = Services {
            search: Arc::new(self.search.clone()),
            fetcher: Arc::new(self.fetcher.clone()),
            model: Arc::new(self.model.clone()),
            videos: Arc::new(self.videos.clone()),
            mailer: Arc::new(self.mailer.clone()),
        };
        recommendation_pipeline(&services, RetryPolicy::immediate(2))
            .run(ShopState::new(QUERY, EMAIL))
            .await
    }
}

fn products_json(titles: &[&str]) -> String {
    let products: Vec<_> = titles
        .iter()
        .map(|title| {
            serde_json::json!({
                "title": title,
                "url": ARTICLE_URL,
                "summary": format!("{title} summary"),
                "pros": ["fast"],
                "cons": ["pricey"],
                "highlights": {"display": "OLED"},
                "score": 4.5
            })
        })
        .collect();
    serde_json::json!({ "products": products }).to_string()
}

fn comparison_json(best: &str) -> String {
    let entry = |name: &str| {
        serde_json::json!({
            "product_name": name,
            "specs_comparison": {
                "processor": "flagship", "battery": "5000 mAh", "camera": "50 MP",
                "display": "6.5in OLED 120Hz", "storage": "128GB"
            },
            "ratings_comparison": {
                "overall_rating": 4.5, "performance": 4.5, "battery_life": 4.0,
                "camera_quality": 4.8, "display_quality": 4.6
            },
            "reviews_summary": "Well reviewed"
        })
    };
    serde_json::json!({
        "comparisons": [entry("Google Pixel 8 Pro"), entry("Apple iPhone 15"), entry("Samsung Galaxy S24")],
        "best_product": {"product_name": best, "justification": "Best camera and display balance"}
    })
    .to_string()
}

const EMAIL_COPY: &str = r#"```json
{"subject": "Capture Every Moment with Google Pixel 8 Pro", "heading": "The Ultimate Photography Smartphone", "justification_line": "Exceptional camera and a vibrant display."}
```"#;

#[tokio::test]
async fn test_end_to_end_smartphone_scenario() {
    let model = MockLanguageModel::new()
        .with_response(products_json(&["Google Pixel 8 Pro", "Apple iPhone 15", "Samsung Galaxy S24"]))
        .with_response(comparison_json("Google Pixel 8 Pro"))
        .with_response(EMAIL_COPY);
    let harness = Harness::new(model);

    let state = harness.run().await;

    // Every field populated
    assert_eq!(state.query(), QUERY);
    assert_eq!(state.email(), EMAIL);
    assert_eq!(state.blogs_content.len(), 1);
    assert!(state.blogs_content[0].text.contains("Pixel 8 Pro"));
    assert_eq!(state.product_schema.len(), 3);
    assert_eq!(state.comparison.len(), 3);
    assert_eq!(state.best_product_name(), Some("Google Pixel 8 Pro"));
    assert_eq!(
        state.youtube_link.as_deref(),
        Some("https://www.youtube.com/watch?v=pX8pRoVid")
    );

    // Consistent
    let view = state.view.as_ref().expect("view should be set");
    assert_eq!(view.products, state.product_schema);
    assert_eq!(view.comparison, state.comparison);
    assert_eq!(view.best_product, state.best_product);
    assert_eq!(view.youtube_link, state.youtube_link);
    assert!(state
        .comparison
        .iter()
        .any(|entry| Some(entry.name.as_str()) == state.best_product_name()));

    // Exactly one email to the given address
    let sent = harness.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, EMAIL);
    assert!(sent[0].html_body.contains("Google Pixel 8 Pro"));
    assert!(sent[0].html_body.contains("https://www.youtube.com/watch?v=pX8pRoVid"));
    assert_eq!(
        state.notification.as_ref().map(|n| n.subject.as_str()),
        Some("Capture Every Moment with Google Pixel 8 Pro")
    );

    assert_eq!(harness.search.queries(), vec![(QUERY.to_string(), 1)]);
    assert_eq!(harness.videos.queries(), vec!["Google Pixel 8 Pro review"]);
    assert_eq!(harness.model.call_count(), 3);
    assert!(!state.is_degraded());
}

#[tokio::test]
async fn test_no_search_results_degrades_everything() {
    let model = MockLanguageModel::new().repeating(products_json(&["A", "B"]));
    let harness = Harness::new(model).without_search_results();

    let state = harness.run().await;

    assert!(state.blogs_content.is_empty());
    assert!(state.product_schema.is_empty());
    assert!(state.comparison.is_empty());
    assert!(state.best_product.is_none());
    assert!(state.youtube_link.is_none());
    assert!(state.view.is_none());
    assert!(state.notification.is_none());
    assert!(state.is_degraded());

    assert_eq!(harness.model.call_count(), 0);
    assert!(harness.fetcher.fetched().is_empty());
    assert!(harness.videos.queries().is_empty());
    assert_eq!(harness.mailer.attempts(), 0);
}

#[tokio::test]
async fn test_single_product_stub_exhausts_retries() {
    let model = MockLanguageModel::new().repeating(products_json(&["Google Pixel 8 Pro"]));
    let harness = Harness::new(model);

    let state = harness.run().await;

    assert!(state.product_schema.is_empty());
    assert!(state.best_product.is_none());
    // Two extraction attempts; comparison and notification skip
    assert_eq!(harness.model.call_count(), 2);
    assert_eq!(harness.mailer.attempts(), 0);
}

#[tokio::test]
async fn test_three_products_returned_in_order() {
    let model = MockLanguageModel::new()
        .with_response(products_json(&["Zeta", "Alpha", "Mu"]))
        .with_response("comparison unavailable");
    let harness = Harness::new(model);

    let state = harness.run().await;

    let titles: Vec<_> = state.product_schema.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Zeta", "Alpha", "Mu"]);
    assert_eq!(state.product_schema[0].pros, vec!["fast"]);
    assert_eq!(state.product_schema[0].summary.as_deref(), Some("Zeta summary"));
    // One extraction call, one failed comparison call
    assert_eq!(harness.model.call_count(), 2);
}

#[tokio::test]
async fn test_no_best_product_skips_video_and_mail() {
    let model = MockLanguageModel::new()
        .with_response(products_json(&["A", "B", "C"]))
        .with_response("The model refused to answer.");
    let harness = Harness::new(model);

    let state = harness.run().await;

    assert_eq!(state.product_schema.len(), 3);
    assert!(state.comparison.is_empty());
    assert!(state.best_product.is_none());
    assert!(state.youtube_link.is_none());
    assert!(state.view.is_none());
    assert!(harness.videos.queries().is_empty());
    assert_eq!(harness.mailer.attempts(), 0);
    // Extraction and comparison only
    assert_eq!(harness.model.call_count(), 2);
}

#[tokio::test]
async fn test_mail_failure_still_completes_run() {
    let model = MockLanguageModel::new()
        .with_response(products_json(&["Google Pixel 8 Pro", "Apple iPhone 15"]))
        .with_response(comparison_json("Google Pixel 8 Pro"))
        .with_response(EMAIL_COPY);
    let mut harness = Harness::new(model);
    harness.mailer = MockMailer::new().failing("535 Username and Password not accepted");

    let state = harness.run().await;

    assert!(state.view.is_some());
    assert!(state.youtube_link.is_some());
    assert!(state.notification.is_none());
    assert_eq!(harness.mailer.attempts(), 1);
}

#[tokio::test]
async fn test_presentation_with_empty_comparison_is_identity() {
    let mut input = ShopState::new(QUERY, EMAIL);
    input.product_schema = vec![ProductReview::new("A"), ProductReview::new("B")];
    input.best_product = Some(BestProduct::new("A", "cheapest"));
    input.youtube_link = Some("https://www.youtube.com/watch?v=x".to_string());

    let output = PresentationStage::new().apply(input.clone()).await;

    assert_eq!(output, input);
}
