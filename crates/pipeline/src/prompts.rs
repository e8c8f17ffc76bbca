//! Prompt builders and the recommendation email template.
//!
//! Every prompt ends with format instructions generated from the Rust type the
//! reply is parsed into, so the schema the model sees cannot drift from the
//! deserializer.

use anyhow::{Context, Result};
use llm_client::format_instructions;
use shop_state::{BlogContent, EmailCopy, ProductComparison, ProductList, ProductReview};

/// Prompt asking the model to turn article text into structured products.
pub fn extraction_prompt(blogs: &[BlogContent]) -> Result<String> {
    let blogs_json = serde_json::to_string_pretty(blogs).context("Serializing blog content")?;
    Ok(format!(
        r#"You are a professional assistant extracting structured product information from review articles.

For every product mentioned in the articles below, add one entry to the `products` array with:
- `title`: the product name
- `url`: link to the article or a relevant product page
- `summary`: a concise summary of the product's main features or purpose
- `pros`: advantages of the product; if the article lists none, derive them from its text
- `cons`: disadvantages of the product; if the article lists none, derive them from its text
- `highlights`: an object of notable features or specifications (feature name to description)
- `score`: the article's numerical rating if it gives one, otherwise 0.0

### Articles
{blogs_json}

Respond with the JSON structure described below and nothing else. It must be valid JSON with no
stray escape sequences or trailing text.

{instructions}
"#,
        instructions = format_instructions::<ProductList>(),
    ))
}

/// Prompt asking the model to compare products and pick a winner.
pub fn comparison_prompt(products: &[ProductReview]) -> Result<String> {
    let products_json = serde_json::to_string(products).context("Serializing product schema")?;
    Ok(format!(
        r#"Compare the products below and recommend one.

1. `comparisons`: one entry per product with
   - `product_name`
   - `specs_comparison`: `processor` (type and model), `battery` (capacity and type),
     `camera` (main specifications), `display` (type, size, refresh rate),
     `storage` (options and whether it is expandable)
   - `ratings_comparison`, each out of 5: `overall_rating`, `performance`, `battery_life`,
     `camera_quality`, `display_quality`
   - `reviews_summary`: the key strengths and weaknesses users report
2. `best_product`: the single best product among those compared
   - `product_name`
   - `justification`: a short explanation grounded in balanced performance, ratings,
     specifications or standout features

### Products
{products_json}

{instructions}
"#,
        instructions = format_instructions::<ProductComparison>(),
    ))
}

/// Prompt asking the model to write the recommendation email copy.
pub fn email_prompt(product_name: &str, justification: &str, user_query: &str) -> String {
    format!(
        r#"You are an expert email copywriter.

Write a product recommendation email from these inputs:
- Product name: {product_name}
- Justification: {justification}
- User query: "{user_query}" (the shopper's general interest, e.g. "a phone for photography")

Example for the product "Google Pixel 8 Pro", justification "Praised for its exceptional camera,
advanced AI capabilities, and vibrant display" and query "a phone with an amazing camera":
{{
  "subject": "Capture Every Moment with Google Pixel 8 Pro",
  "heading": "Discover the Power of the Ultimate Photography Smartphone",
  "justification_line": "Known for its exceptional camera, cutting-edge AI features and vibrant display, the Google Pixel 8 Pro is perfect for photography enthusiasts."
}}

{instructions}
"#,
        instructions = format_instructions::<EmailCopy>(),
    )
}

// =============================================================================
// Email Template
// =============================================================================

const EMAIL_TEMPLATE: &str = r#"<html>
<head>
    <style>
        body { font-family: Arial, sans-serif; margin: 0; padding: 0; background-color: #f4f4f4; }
        .email-container { max-width: 600px; margin: 20px auto; background-color: #ffffff; border-radius: 8px; box-shadow: 0 2px 4px rgba(0, 0, 0, 0.1); overflow: hidden; }
        .header { background-color: #007BFF; color: #ffffff; padding: 20px; text-align: center; }
        .header h1 { margin: 0; font-size: 24px; }
        .content { padding: 20px; }
        .content h2 { color: #333333; font-size: 20px; margin-bottom: 10px; }
        .content p { color: #555555; font-size: 16px; line-height: 1.5; }
        .button { display: inline-block; margin-top: 20px; background-color: #007BFF; color: #ffffff; padding: 10px 20px; text-decoration: none; border-radius: 5px; }
        .footer { text-align: center; font-size: 14px; color: #999999; padding: 10px 20px; }
        .footer a { color: #007BFF; text-decoration: none; }
    </style>
</head>
<body>
    <div class="email-container">
        <div class="header">
            <h1>{heading}</h1>
        </div>
        <div class="content">
            <h2>Our Top Pick: {product_name}</h2>
            <p>{justification}</p>
{review_block}
        </div>
        <div class="footer">
            <p>Want to learn more? Follow us for more recommendations.</p>
            <p>&copy; ShopGenie Recommendations</p>
        </div>
    </div>
</body>
</html>
"#;

/// Render the recommendation email. Text values are HTML-escaped.
pub fn render_email_html(copy: &EmailCopy, product_name: &str, youtube_link: Option<&str>) -> String {
    let review_block = match youtube_link.filter(|link| !link.trim().is_empty()) {
        Some(link) => format!(
            "            <p>Watch an in-depth review to see why this is the best choice for you:</p>\n            \
             <a href=\"{}\" class=\"button\" target=\"_blank\">Watch the Review</a>",
            escape_html(link)
        ),
        None => String::new(),
    };

    fill_template(
        EMAIL_TEMPLATE,
        &[
            ("heading", escape_html(&copy.heading)),
            ("product_name", escape_html(product_name)),
            ("justification", escape_html(&copy.justification_line)),
            ("review_block", review_block),
        ],
    )
}

/// Single-pass `{key}` substitution; unknown braces (CSS) pass through.
fn fill_template(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len() + 512);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replacement = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (value, close))
        });
        match replacement {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
