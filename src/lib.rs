//! mdxblog: a static blog generator for MDX-style content
//!
//! Posts and author profiles live as markdown/MDX documents with YAML
//! front matter; each document names a layout from a closed registry.
//! Pages are generated with a consent-gated analytics region, and the
//! dev server answers the newsletter signup and consent endpoints.

pub mod commands;
pub mod config;
pub mod consent;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod layout;
pub mod newsletter;
pub mod server;

use anyhow::Result;
use std::path::Path;

/// The site rooted at a directory
#[derive(Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Content directory (posts, authors, standalone pages)
    pub data_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
}

impl Site {
    /// Create a new site instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let data_dir = base_dir.join(&config.data_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            data_dir,
            public_dir,
        })
    }

    /// Initialize a new site
    pub fn init(&self) -> Result<()> {
        commands::init::run(self)
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Publish the feed for the current set of posts
    pub fn publish_feed(&self) -> Result<()> {
        commands::feed::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new post
    pub fn new_post(&self, title: &str, layout: Option<&str>) -> Result<()> {
        commands::new::run(self, title, layout)
    }
}
