//! Publish the feed
//!
//! Explicit operation: the generator and the list query never write the
//! feed, only this command does.

use anyhow::Result;

use crate::content::ContentLoader;
use crate::generator::feed;
use crate::Site;

/// Publish the RSS feed for the current posts
pub fn run(site: &Site) -> Result<()> {
    if !site.config.feed.enable {
        tracing::warn!("Feed generation is disabled in the configuration");
        return Ok(());
    }

    let loader = ContentLoader::new(site);
    let posts = loader.load_posts()?;

    let path = feed::publish(site, &posts)?;
    println!("Published feed: {:?}", path);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_feed_command_writes_feed() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("data/blog")).unwrap();
        fs::write(
            tmp.path().join("data/blog/post.mdx"),
            "---\ntitle: Post\ndate: 2024-01-01\nsummary: One post.\n---\nBody.\n",
        )
        .unwrap();
        let site = Site::new(tmp.path()).unwrap();

        run(&site).unwrap();
        assert!(site.public_dir.join("feed.xml").is_file());
    }

    #[test]
    fn test_feed_command_respects_disable() {
        let tmp = TempDir::new().unwrap();
        let mut site = Site::new(tmp.path()).unwrap();
        site.config.feed.enable = false;

        run(&site).unwrap();
        assert!(!site.public_dir.join("feed.xml").exists());
    }
}
