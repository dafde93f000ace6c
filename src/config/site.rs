//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub data_dir: String,
    pub public_dir: String,
    pub posts_dir: String,
    pub authors_dir: String,
    pub tag_dir: String,
    pub static_dir: String,

    // Writing
    pub default_layout: String,
    pub render_drafts: bool,

    // Date format (strftime)
    pub date_format: String,

    // Pagination
    pub per_page: usize,
    pub pagination_dir: String,

    /// Deployment environment; analytics embeds that are production-only
    /// check this field
    pub environment: String,

    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub newsletter: NewsletterConfig,
    #[serde(default)]
    pub consent: ConsentConfig,
    #[serde(default)]
    pub feed: FeedConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            description: String::new(),
            author: "John Doe".to_string(),
            language: "en".to_string(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            data_dir: "data".to_string(),
            public_dir: "public".to_string(),
            posts_dir: "blog".to_string(),
            authors_dir: "authors".to_string(),
            tag_dir: "tags".to_string(),
            static_dir: "static".to_string(),

            default_layout: "PostLayout".to_string(),
            render_drafts: false,

            date_format: "%B %-d, %Y".to_string(),

            per_page: 5,
            pagination_dir: "page".to_string(),

            environment: "development".to_string(),

            analytics: AnalyticsConfig::default(),
            newsletter: NewsletterConfig::default(),
            consent: ConsentConfig::default(),
            feed: FeedConfig::default(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Whether production-only embeds (Plausible, Simple Analytics) are active
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Third-party analytics integrations, each mounted only when configured
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub google_analytics_id: String,
    pub plausible_data_domain: String,
    pub simple_analytics: bool,
}

/// Newsletter provider configuration
///
/// The API key is never stored in the config file; it is read from the
/// environment variable named by `api_key_env` at request time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsletterConfig {
    pub provider: String,
    pub endpoint: String,
    pub api_key_env: String,
}

impl Default for NewsletterConfig {
    fn default() -> Self {
        Self {
            provider: "buttondown".to_string(),
            endpoint: String::new(),
            api_key_env: "NEWSLETTER_API_KEY".to_string(),
        }
    }
}

/// Cookie-consent configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsentConfig {
    /// Cookie key holding the persisted consent flag
    pub cookie_name: String,
    /// Cookie lifetime in days; `None` means a session cookie
    pub expiry_days: Option<u32>,
}

impl Default for ConsentConfig {
    fn default() -> Self {
        Self {
            cookie_name: "cookie-consent".to_string(),
            expiry_days: Some(31),
        }
    }
}

/// Feed generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub enable: bool,
    pub path: String,
    pub limit: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enable: true,
            path: "feed.xml".to_string(),
            limit: 20,
        }
    }
}
