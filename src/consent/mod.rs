//! Cookie-consent gate
//!
//! On each render the gate reads the persisted consent flag and decides
//! between the consent prompt and the analytics embeds. The flag lives
//! behind the `ConsentStore` trait so the same gate runs over request
//! cookies, an in-process map in tests, or any other key-value store.
//!
//! `accept` and `revoke` mutate the store; the caller answers with a
//! redirect so the next full render observes the new flag (the reload
//! contract keeping build-time and request-time decisions consistent).

pub mod analytics;

use std::collections::HashMap;

use chrono::{Duration, Utc};
use thiserror::Error;

use crate::config::ConsentConfig;

/// Errors raised by consent storage
#[derive(Debug, Error)]
pub enum ConsentError {
    #[error("consent storage unavailable: {0}")]
    Storage(String),
}

/// The two render branches of the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Show the consent-request prompt
    Prompt,
    /// Mount the analytics embeds
    Analytics,
}

/// Abstract key-value persistence for the consent flag
pub trait ConsentStore {
    fn get(&self, key: &str) -> Result<Option<String>, ConsentError>;
    fn set(&mut self, key: &str, value: &str, expiry_days: Option<u32>)
        -> Result<(), ConsentError>;
    fn remove(&mut self, key: &str) -> Result<(), ConsentError>;
}

/// In-process store used by tests and the CLI preview
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl ConsentStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, ConsentError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(
        &mut self,
        key: &str,
        value: &str,
        _expiry_days: Option<u32>,
    ) -> Result<(), ConsentError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), ConsentError> {
        self.values.remove(key);
        Ok(())
    }
}

/// Store backed by the HTTP cookie header
///
/// Reads from a parsed `Cookie` request header; writes accumulate as
/// `Set-Cookie` response values in the literal
/// `name=value; Expires=<UTC date>; Path=/` form.
#[derive(Debug, Default)]
pub struct CookieStore {
    values: HashMap<String, String>,
    pending: Vec<String>,
}

impl CookieStore {
    /// Parse a `Cookie` request header ("a=b; c=d")
    pub fn from_header(header: Option<&str>) -> Self {
        let mut values = HashMap::new();
        if let Some(header) = header {
            for pair in header.split(';') {
                if let Some((name, value)) = pair.trim().split_once('=') {
                    values.insert(name.trim().to_string(), value.trim().to_string());
                }
            }
        }
        Self {
            values,
            pending: Vec::new(),
        }
    }

    /// `Set-Cookie` header values accumulated by writes
    pub fn set_cookie_headers(&self) -> &[String] {
        &self.pending
    }
}

impl ConsentStore for CookieStore {
    fn get(&self, key: &str) -> Result<Option<String>, ConsentError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(
        &mut self,
        key: &str,
        value: &str,
        expiry_days: Option<u32>,
    ) -> Result<(), ConsentError> {
        let cookie = match expiry_days {
            Some(days) => {
                let expires = Utc::now() + Duration::days(days as i64);
                format!(
                    "{}={}; Expires={}; Path=/",
                    key,
                    value,
                    expires.format("%a, %d %b %Y %H:%M:%S GMT")
                )
            }
            None => format!("{}={}; Path=/", key, value),
        };
        self.pending.push(cookie);
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), ConsentError> {
        self.pending.push(format!(
            "{}=; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Path=/",
            key
        ));
        self.values.remove(key);
        Ok(())
    }
}

/// The consent gate over an injected store
pub struct ConsentGate<S: ConsentStore> {
    store: S,
    key: String,
    expiry_days: Option<u32>,
}

impl<S: ConsentStore> ConsentGate<S> {
    /// Create a gate over a store, keyed per configuration
    pub fn new(store: S, config: &ConsentConfig) -> Self {
        Self {
            store,
            key: config.cookie_name.clone(),
            expiry_days: config.expiry_days,
        }
    }

    /// Decide the render branch; read-only
    ///
    /// The flag is tri-state: absent or any value other than "true"
    /// yields the prompt, exactly "true" yields analytics.
    pub fn decide(&self) -> Result<Decision, ConsentError> {
        match self.store.get(&self.key)? {
            Some(value) if value == "true" => Ok(Decision::Analytics),
            _ => Ok(Decision::Prompt),
        }
    }

    /// Persist the opt-in flag
    pub fn accept(&mut self) -> Result<(), ConsentError> {
        self.store.set(&self.key, "true", self.expiry_days)
    }

    /// Clear the flag ("stop collecting")
    pub fn revoke(&mut self) -> Result<(), ConsentError> {
        self.store.remove(&self.key)
    }

    /// Consume the gate and return the store (to flush Set-Cookie headers)
    pub fn into_store(self) -> S {
        self.store
    }
}

const CONSENT_START: &str = "<!-- consent:start -->";
const CONSENT_END: &str = "<!-- consent:end -->";

/// The consent region embedded into every generated page
///
/// Static generation cannot know the flag, so pages carry the prompt;
/// the serving layer swaps the region when the flag reads true.
pub fn consent_region() -> String {
    format!(
        r#"{start}
<div class="cookie-consent">
  <p>By clicking &ldquo;I Accept&rdquo;, you agree to the storing of cookies on your device to enhance site navigation and analyze site usage</p>
  <form method="post" action="/consent/accept"><button type="submit">Accept</button></form>
  <a href="/privacy/">Privacy Policy</a>
</div>
{end}"#,
        start = CONSENT_START,
        end = CONSENT_END
    )
}

/// Swap the consent region of a rendered page for the analytics embeds
///
/// `Decision::Prompt` leaves the page untouched.
pub fn apply_decision(html: &str, decision: Decision, analytics_html: &str) -> String {
    if decision == Decision::Prompt {
        return html.to_string();
    }

    match (html.find(CONSENT_START), html.find(CONSENT_END)) {
        (Some(start), Some(end)) if end > start => {
            let mut out = String::with_capacity(html.len());
            out.push_str(&html[..start]);
            out.push_str(analytics_html);
            out.push_str(&html[end + CONSENT_END.len()..]);
            out
        }
        _ => html.to_string(),
    }
}
