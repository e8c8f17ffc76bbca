//! # Providers Crate
//!
//! Clients for the external services the recommendation pipeline consumes.
//! Each service sits behind a small async trait so stages can be driven by
//! the real client in production and by a scripted mock in tests.
//!
//! ## Components
//!
//! | trait            | production client | service                         |
//! |------------------|-------------------|---------------------------------|
//! | `SearchProvider` | `TavilyClient`    | Tavily web search               |
//! | `PageFetcher`    | `WebPageFetcher`  | plain HTTP GET + HTML-to-text   |
//! | `VideoSearch`    | `YouTubeClient`   | YouTube Data API v3 search.list |
//! | `Mailer`         | `SmtpMailer`      | SMTP submission over STARTTLS   |
//!
//! ## Example Usage
//!
//! ```ignore
//! use providers::{SearchProvider, TavilyClient, WebPageFetcher, PageFetcher};
//! use std::time::Duration;
//!
//! let http = WebPageFetcher::build_http_client(Duration::from_secs(30))?;
//! let search = TavilyClient::new(api_key, http.clone());
//! let fetcher = WebPageFetcher::new(http);
//!
//! let hits = search.search("best smartphones under $1000", 1).await?;
//! let text = fetcher.fetch(&hits[0].url).await?;
//! ```

// Public modules
pub mod error;
pub mod fetcher;
pub mod mailer;
pub mod mock;
pub mod search;
pub mod video;

// Re-export commonly used types
pub use error::{ProviderError, Result};
pub use fetcher::{html_to_text, PageFetcher, WebPageFetcher};
pub use mailer::{Mailer, OutgoingEmail, SmtpMailer, DEFAULT_SMTP_HOST, DEFAULT_SMTP_PORT};
pub use mock::{MockMailer, MockPageFetcher, MockSearchProvider, MockVideoSearch};
pub use search::{SearchHit, SearchProvider, TavilyClient};
pub use video::{watch_url, VideoHit, VideoSearch, YouTubeClient};
