//! Error types for the external service clients.

use thiserror::Error;

/// Errors that can occur when talking to a search, page, video or mail service
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Client could not be built from the given settings
    #[error("Invalid {service} configuration: {reason}")]
    Config { service: &'static str, reason: String },

    /// Connection failed, timed out, or the body could not be read
    #[error("{service} request failed: {reason}")]
    Network { service: &'static str, reason: String },

    /// Non-2xx response
    #[error("{service} returned {status}: {body}")]
    Api {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// Response body did not have the expected shape
    #[error("Unexpected {service} response: {reason}")]
    Parse { service: &'static str, reason: String },

    /// Message could not be built or was rejected by the SMTP server
    #[error("Mail delivery failed: {0}")]
    Mail(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Check the status of a response, turning non-2xx into `ProviderError::Api`.
pub(crate) async fn ensure_success(
    service: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(service, status = %status, error = %body, "Provider API error");
    Err(ProviderError::Api {
        service,
        status: status.as_u16(),
        body,
    })
}

pub(crate) fn network(service: &'static str) -> impl Fn(reqwest::Error) -> ProviderError {
    move |e| ProviderError::Network {
        service,
        reason: e.to_string(),
    }
}
