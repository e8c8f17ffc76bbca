//! Runtime configuration, read once at startup and passed by reference.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use providers::{DEFAULT_SMTP_HOST, DEFAULT_SMTP_PORT};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Credentials and tunables for one process.
#[derive(Clone, PartialEq)]
pub struct Config {
    pub tavily_api_key: String,
    pub groq_api_key: String,
    pub youtube_api_key: String,
    pub gmail_user: String,
    pub gmail_pass: String,
    pub groq_model: String,
    pub llm_temperature: f32,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub extraction_max_attempts: usize,
    pub extraction_retry_delay: Duration,
    pub http_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_attempts: usize = optional(&lookup, "EXTRACTION_MAX_ATTEMPTS", 2)?;
        if max_attempts == 0 {
            return Err(invalid("EXTRACTION_MAX_ATTEMPTS", "0", "must be at least 1"));
        }

        let temperature: f32 = optional(&lookup, "LLM_TEMPERATURE", llm_client::DEFAULT_TEMPERATURE)?;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(invalid(
                "LLM_TEMPERATURE",
                &temperature.to_string(),
                "must be between 0 and 2",
            ));
        }

        Ok(Self {
            tavily_api_key: required(&lookup, "TAVILY_API_KEY")?,
            groq_api_key: required(&lookup, "GROQ_API_KEY")?,
            youtube_api_key: required(&lookup, "YOUTUBE_API_KEY")?,
            gmail_user: required(&lookup, "GMAIL_USER")?,
            gmail_pass: required(&lookup, "GMAIL_PASS")?,
            groq_model: optional(&lookup, "GROQ_MODEL", llm_client::DEFAULT_MODEL.to_string())?,
            llm_temperature: temperature,
            smtp_host: optional(&lookup, "SMTP_HOST", DEFAULT_SMTP_HOST.to_string())?,
            smtp_port: optional(&lookup, "SMTP_PORT", DEFAULT_SMTP_PORT)?,
            extraction_max_attempts: max_attempts,
            extraction_retry_delay: Duration::from_secs(optional(
                &lookup,
                "EXTRACTION_RETRY_DELAY_SECS",
                60,
            )?),
            http_timeout: Duration::from_secs(optional(&lookup, "HTTP_TIMEOUT_SECS", 30)?),
        })
    }

    /// Every setting by variable name, secrets masked.
    pub fn describe(&self) -> Vec<(&'static str, String)> {
        vec![
            ("TAVILY_API_KEY", mask(&self.tavily_api_key)),
            ("GROQ_API_KEY", mask(&self.groq_api_key)),
            ("YOUTUBE_API_KEY", mask(&self.youtube_api_key)),
            ("GMAIL_USER", self.gmail_user.clone()),
            ("GMAIL_PASS", mask(&self.gmail_pass)),
            ("GROQ_MODEL", self.groq_model.clone()),
            ("LLM_TEMPERATURE", self.llm_temperature.to_string()),
            ("SMTP_HOST", self.smtp_host.clone()),
            ("SMTP_PORT", self.smtp_port.to_string()),
            ("EXTRACTION_MAX_ATTEMPTS", self.extraction_max_attempts.to_string()),
            (
                "EXTRACTION_RETRY_DELAY_SECS",
                self.extraction_retry_delay.as_secs().to_string(),
            ),
            ("HTTP_TIMEOUT_SECS", self.http_timeout.as_secs().to_string()),
        ]
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("tavily_api_key", &mask(&self.tavily_api_key))
            .field("groq_api_key", &mask(&self.groq_api_key))
            .field("youtube_api_key", &mask(&self.youtube_api_key))
            .field("gmail_user", &self.gmail_user)
            .field("gmail_pass", &mask(&self.gmail_pass))
            .field("groq_model", &self.groq_model)
            .field("llm_temperature", &self.llm_temperature)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("extraction_max_attempts", &self.extraction_max_attempts)
            .field("extraction_retry_delay", &self.extraction_retry_delay)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::Missing(name))
}

/// Blank counts as unset.
fn optional<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(name).map(|value| value.trim().to_string()) {
        Some(value) if !value.is_empty() => value
            .parse()
            .map_err(|e: T::Err| invalid(name, &value, &e.to_string())),
        _ => Ok(default),
    }
}

fn invalid(name: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        name,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Keep the last four characters of long secrets.
fn mask(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 8 {
        return "****".to_string();
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("****{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    const REQUIRED: &[(&str, &str)] = &[
        ("TAVILY_API_KEY", "tvly-0123456789abcdef"),
        ("GROQ_API_KEY", "gsk_0123456789abcdef"),
        ("YOUTUBE_API_KEY", "AIza0123456789abcdef"),
        ("GMAIL_USER", "genie@example.com"),
        ("GMAIL_PASS", "app-password-1234"),
    ];

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(REQUIRED)).unwrap();

        assert_eq!(config.groq_model, "llama-3.3-70b-versatile");
        assert_eq!(config.llm_temperature, 0.5);
        assert_eq!(config.smtp_host, "smtp.gmail.com");
        assert_eq!(config.smtp_port, 587);
        assert_eq!(config.extraction_max_attempts, 2);
        assert_eq!(config.extraction_retry_delay, Duration::from_secs(60));
        assert_eq!(config.http_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_missing_credential_fails() {
        for (name, _) in REQUIRED {
            let pairs: Vec<_> = REQUIRED.iter().copied().filter(|(k, _)| k != name).collect();
            let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
            assert_eq!(err, ConfigError::Missing(*name));
        }
    }

    #[test]
    fn test_blank_credential_is_missing() {
        let mut pairs = REQUIRED.to_vec();
        pairs[1] = ("GROQ_API_KEY", "   ");

        let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert_eq!(err, ConfigError::Missing("GROQ_API_KEY"));
        assert_eq!(err.to_string(), "GROQ_API_KEY must be set");
    }

    #[test]
    fn test_overrides_and_invalid_values() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("EXTRACTION_RETRY_DELAY_SECS", "0"));
        pairs.push(("SMTP_PORT", "2525"));
        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.extraction_retry_delay, Duration::ZERO);
        assert_eq!(config.smtp_port, 2525);

        pairs.push(("HTTP_TIMEOUT_SECS", "soon"));
        let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "HTTP_TIMEOUT_SECS", .. }));

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("EXTRACTION_MAX_ATTEMPTS", "0"));
        let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "EXTRACTION_MAX_ATTEMPTS", .. }));
    }

    #[test]
    fn test_debug_masks_secrets() {
        let config = Config::from_lookup(lookup_from(REQUIRED)).unwrap();
        let debug = format!("{:?}", config);

        assert!(!debug.contains("tvly-0123456789abcdef"));
        assert!(!debug.contains("app-password-1234"));
        assert!(debug.contains("****cdef"));
        assert!(debug.contains("genie@example.com"));

        let described = config.describe();
        assert!(described.iter().all(|(_, value)| !value.contains("gsk_0123")));
    }
}
