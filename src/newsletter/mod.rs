//! Newsletter signup proxy
//!
//! The signup form posts `{ email }` to `/api/{provider}`; this module
//! forwards the address to the configured provider with the API key held
//! server-side. The response shape is fixed to two JSON bodies: `{}` on
//! success and `{"error": true}` on any failure, so provider details
//! never leak to the subscriber.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::NewsletterConfig;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// The signup request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
}

/// Outcome of a signup attempt
///
/// Every failure collapses to `Rejected`; the subscriber sees one
/// generic message whether the address was invalid, already subscribed
/// or the provider was unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeOutcome {
    Subscribed,
    Rejected,
}

impl SubscribeOutcome {
    /// The JSON body returned to the signup form
    pub fn into_response(self) -> Value {
        match self {
            SubscribeOutcome::Subscribed => json!({}),
            SubscribeOutcome::Rejected => json!({ "error": true }),
        }
    }
}

/// Forwards signup requests to the configured provider
#[derive(Clone)]
pub struct NewsletterClient {
    config: NewsletterConfig,
    http: reqwest::Client,
}

impl NewsletterClient {
    pub fn new(config: NewsletterConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Attempt one subscription; one attempt, no retry
    ///
    /// `provider` comes from the request path and must match the
    /// configured provider; anything else is rejected without a
    /// provider round-trip.
    pub async fn subscribe(&self, provider: &str, request: &SubscribeRequest) -> SubscribeOutcome {
        if provider != self.config.provider {
            tracing::debug!("rejecting signup for unknown provider {:?}", provider);
            return SubscribeOutcome::Rejected;
        }
        if !EMAIL_RE.is_match(&request.email) {
            return SubscribeOutcome::Rejected;
        }
        if self.config.endpoint.is_empty() {
            tracing::warn!("newsletter endpoint not configured");
            return SubscribeOutcome::Rejected;
        }

        let mut forward = self
            .http
            .post(&self.config.endpoint)
            .json(&json!({ "email": request.email }));

        if let Ok(key) = std::env::var(&self.config.api_key_env) {
            forward = forward.header("Authorization", format!("Token {}", key));
        }

        match forward.send().await {
            Ok(response) if response.status().is_success() => SubscribeOutcome::Subscribed,
            Ok(response) => {
                tracing::debug!("provider answered {} for signup", response.status());
                SubscribeOutcome::Rejected
            }
            Err(e) => {
                tracing::warn!("newsletter forward failed: {}", e);
                SubscribeOutcome::Rejected
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_bodies_are_fixed() {
        assert_eq!(SubscribeOutcome::Subscribed.into_response().to_string(), "{}");
        assert_eq!(
            SubscribeOutcome::Rejected.into_response().to_string(),
            r#"{"error":true}"#
        );
    }

    #[test]
    fn test_email_shape_check() {
        assert!(EMAIL_RE.is_match("jane@example.com"));
        assert!(EMAIL_RE.is_match("jane+tag@sub.example.co"));
        assert!(!EMAIL_RE.is_match("jane"));
        assert!(!EMAIL_RE.is_match("jane@"));
        assert!(!EMAIL_RE.is_match("jane@example"));
        assert!(!EMAIL_RE.is_match("jane doe@example.com"));
    }

    #[tokio::test]
    async fn test_unknown_provider_is_rejected_locally() {
        let client = NewsletterClient::new(NewsletterConfig::default());
        let request = SubscribeRequest {
            email: "jane@example.com".to_string(),
        };
        let outcome = client.subscribe("convertkit", &request).await;
        assert_eq!(outcome, SubscribeOutcome::Rejected);
    }

    #[tokio::test]
    async fn test_invalid_email_is_rejected_before_forwarding() {
        let client = NewsletterClient::new(NewsletterConfig::default());
        let request = SubscribeRequest {
            email: "not-an-address".to_string(),
        };
        let outcome = client.subscribe("buttondown", &request).await;
        assert_eq!(outcome, SubscribeOutcome::Rejected);
    }

    #[tokio::test]
    async fn test_missing_endpoint_is_rejected() {
        // default config has no endpoint
        let client = NewsletterClient::new(NewsletterConfig::default());
        let request = SubscribeRequest {
            email: "jane@example.com".to_string(),
        };
        let outcome = client.subscribe("buttondown", &request).await;
        assert_eq!(outcome, SubscribeOutcome::Rejected);
    }
}
