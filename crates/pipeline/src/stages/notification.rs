//! Stage that emails the recommendation to the shopper.
//!
//! ## Algorithm
//! 1. Skip without a best product
//! 2. Ask the model for subject, heading and a one-line justification
//! 3. Render the HTML template with the product name and review link
//! 4. Send to the run's single recipient
//!
//! Any failure is logged and leaves `notification` unset.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use llm_client::{complete_json, LanguageModel};
use providers::{Mailer, OutgoingEmail};
use shop_state::{BestProduct, EmailCopy, SentNotification, ShopState};
use tracing::{error, info};

use crate::prompts;
use crate::traits::Stage;

/// Writes `notification`.
pub struct NotificationStage {
    model: Arc<dyn LanguageModel>,
    mailer: Arc<dyn Mailer>,
}

impl NotificationStage {
    pub fn new(model: Arc<dyn LanguageModel>, mailer: Arc<dyn Mailer>) -> Self {
        Self { model, mailer }
    }

    async fn notify(&self, state: &ShopState, best: &BestProduct) -> Result<SentNotification> {
        let prompt = prompts::email_prompt(&best.name, &best.justification, state.query());
        let copy: EmailCopy = complete_json(self.model.as_ref(), &prompt)
            .await
            .context("Email copy generation failed")?;

        let html_body = prompts::render_email_html(&copy, &best.name, state.youtube_link.as_deref());
        let email = OutgoingEmail {
            to: state.email().to_string(),
            subject: copy.subject,
            html_body,
        };
        let sent = SentNotification {
            recipient: email.to.clone(),
            subject: email.subject.clone(),
        };

        self.mailer
            .send(email)
            .await
            .with_context(|| format!("Sending recommendation to {}", sent.recipient))?;
        Ok(sent)
    }
}

#[async_trait]
impl Stage for NotificationStage {
    fn name(&self) -> &str {
        "notification"
    }

    async fn apply(&self, mut state: ShopState) -> ShopState {
        let best = match state.best_product.clone() {
            Some(best) if !best.name.trim().is_empty() => best,
            _ => {
                info!("No best product available; email skipped");
                return state;
            }
        };

        match self.notify(&state, &best).await {
            Ok(sent) => {
                info!("Email sent successfully to {}", sent.recipient);
                state.notification = Some(sent);
            }
            Err(e) => error!("Error in notification stage: {:#}", e),
        }
        state
    }
}
