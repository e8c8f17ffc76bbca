//! # Shop Orchestrator
//!
//! Wires configuration into the six pipeline stages and runs them:
//! 1. Build one shared HTTP client (timeout, user agent)
//! 2. Build the search, page, model, video and mail clients on top of it
//! 3. Assemble the stage pipeline with the configured retry policy
//! 4. Run a query through it and return the final state
//!
//! Construction is the only fallible step. A run always completes; degraded
//! fields in the returned state are the only sign that a stage failed.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, instrument, warn};

use llm_client::GroqClient;
use pipeline::{recommendation_pipeline, RetryPolicy, Services, StagePipeline};
use providers::{SmtpMailer, TavilyClient, WebPageFetcher, YouTubeClient};
use shop_state::ShopState;

use crate::config::Config;

/// Owns the assembled pipeline; cheap to share behind an `Arc`.
pub struct ShopOrchestrator {
    pipeline: StagePipeline,
}

impl ShopOrchestrator {
    /// Create an orchestrator backed by the real external services.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = WebPageFetcher::build_http_client(config.http_timeout)
            .context("Failed to build HTTP client")?;

        let model = GroqClient::new(config.groq_api_key.clone())
            .with_http_client(http.clone())
            .with_model(config.groq_model.clone())
            .with_temperature(config.llm_temperature);

        let mailer = SmtpMailer::new(
            &config.smtp_host,
            config.smtp_port,
            &config.gmail_user,
            &config.gmail_pass,
        )
        .context("Failed to build SMTP transport")?;

        let services = Services {
            search: Arc::new(TavilyClient::new(config.tavily_api_key.clone(), http.clone())),
            fetcher: Arc::new(WebPageFetcher::new(http.clone())),
            model: Arc::new(model),
            videos: Arc::new(YouTubeClient::new(config.youtube_api_key.clone(), http)),
            mailer: Arc::new(mailer),
        };
        let retry = RetryPolicy::new(config.extraction_max_attempts, config.extraction_retry_delay);

        info!(
            "Orchestrator ready (model: {}, smtp: {}:{})",
            config.groq_model, config.smtp_host, config.smtp_port
        );
        Ok(Self::with_services(&services, retry))
    }

    /// Create an orchestrator over caller-supplied services (tests, other backends).
    pub fn with_services(services: &Services, retry: RetryPolicy) -> Self {
        Self {
            pipeline: recommendation_pipeline(services, retry),
        }
    }

    /// Main entry point: run one query through every stage
    ///
    /// # Returns
    /// The final state; `query` and `email` are always preserved
    #[instrument(skip(self, email))]
    pub async fn run(&self, query: &str, email: &str) -> ShopState {
        let start_time = Instant::now();
        info!("Starting recommendation workflow");

        let state = self.pipeline.run(ShopState::new(query, email)).await;

        match state.best_product_name() {
            Some(name) => info!("Recommended {:?}", name),
            None => warn!("Workflow finished without a recommendation"),
        }
        info!("Total workflow time: {:.2?}", start_time.elapsed());
        state
    }
}

/// Build an orchestrator from `config` and run one query.
///
/// Errors only come from building the service clients.
pub async fn run_workflow(config: &Config, query: &str, email: &str) -> Result<ShopState> {
    let orchestrator = ShopOrchestrator::from_config(config)?;
    Ok(orchestrator.run(query, email).await)
}
