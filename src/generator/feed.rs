//! RSS feed publishing
//!
//! Publishing the feed is its own operation: the generator never writes
//! it while rendering pages, and the `list` query never touches disk.

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::content::Post;
use crate::helpers::{escape_xml, full_url_for, strip_html, truncate};
use crate::Site;

/// Publish the RSS 2.0 feed for the newest posts
///
/// Returns the path of the written file. Honors `feed.limit`; drafts are
/// already filtered by the loader.
pub fn publish(site: &Site, posts: &[Post]) -> Result<PathBuf> {
    let config = &site.config;

    let mut feed = String::new();
    feed.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    feed.push('\n');
    feed.push_str(r#"<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom">"#);
    feed.push('\n');
    feed.push_str("  <channel>\n");
    feed.push_str(&format!(
        "    <title>{}</title>\n",
        escape_xml(&config.title)
    ));
    feed.push_str(&format!(
        "    <link>{}</link>\n",
        escape_xml(&full_url_for(config, ""))
    ));
    feed.push_str(&format!(
        "    <description>{}</description>\n",
        escape_xml(&config.description)
    ));
    feed.push_str(&format!(
        "    <language>{}</language>\n",
        escape_xml(&config.language)
    ));
    feed.push_str(&format!(
        "    <atom:link href=\"{}\" rel=\"self\" type=\"application/rss+xml\"/>\n",
        escape_xml(&full_url_for(config, &config.feed.path))
    ));
    if let Some(newest) = posts.first() {
        feed.push_str(&format!(
            "    <lastBuildDate>{}</lastBuildDate>\n",
            newest.date.to_rfc2822()
        ));
    }

    for post in posts.iter().take(config.feed.limit) {
        feed.push_str("    <item>\n");
        feed.push_str(&format!(
            "      <title>{}</title>\n",
            escape_xml(&post.title)
        ));
        feed.push_str(&format!(
            "      <link>{}</link>\n",
            escape_xml(&post.permalink)
        ));
        feed.push_str(&format!(
            "      <guid>{}</guid>\n",
            escape_xml(&post.permalink)
        ));
        // summary when present, otherwise the opening of the post body
        let description = post
            .summary
            .clone()
            .unwrap_or_else(|| truncate(&strip_html(&post.content), 280, None));
        if !description.trim().is_empty() {
            feed.push_str(&format!(
                "      <description>{}</description>\n",
                escape_xml(description.trim())
            ));
        }
        feed.push_str(&format!(
            "      <pubDate>{}</pubDate>\n",
            post.date.to_rfc2822()
        ));
        feed.push_str(&format!(
            "      <author>{}</author>\n",
            escape_xml(&config.author)
        ));
        for tag in &post.tags {
            feed.push_str(&format!("      <category>{}</category>\n", escape_xml(tag)));
        }
        feed.push_str("    </item>\n");
    }

    feed.push_str("  </channel>\n");
    feed.push_str("</rss>\n");

    fs::create_dir_all(&site.public_dir)?;
    let output_path = site.public_dir.join(&config.feed.path);
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output_path, feed)?;
    tracing::info!("Published feed: {:?}", output_path);

    Ok(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use tempfile::TempDir;

    fn post(title: &str, day: u32) -> Post {
        let date = Local.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap();
        let mut p = Post::new(title.to_string(), date, format!("blog/{}.md", title));
        p.path = format!("{}/", p.slug);
        p.permalink = format!("http://example.com/{}/", p.slug);
        p.summary = Some(format!("{} summary", title));
        p.tags = vec!["rust".to_string()];
        p
    }

    #[test]
    fn test_publish_writes_rss() {
        let tmp = TempDir::new().unwrap();
        let site = Site::new(tmp.path()).unwrap();

        let posts = vec![post("Newer", 20), post("Older", 10)];
        let path = publish(&site, &posts).unwrap();

        assert_eq!(path, site.public_dir.join("feed.xml"));
        let xml = fs::read_to_string(&path).unwrap();
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains("<rss version=\"2.0\""));
        assert!(xml.contains("<title>Newer</title>"));
        assert!(xml.contains("<guid>http://example.com/newer/</guid>"));
        assert!(xml.contains("<category>rust</category>"));
        // newest first drives lastBuildDate
        let newest = posts[0].date.to_rfc2822();
        assert!(xml.contains(&format!("<lastBuildDate>{}</lastBuildDate>", newest)));
    }

    #[test]
    fn test_publish_honors_limit() {
        let tmp = TempDir::new().unwrap();
        let mut site = Site::new(tmp.path()).unwrap();
        site.config.feed.limit = 1;

        let posts = vec![post("Newer", 20), post("Older", 10)];
        let path = publish(&site, &posts).unwrap();

        let xml = fs::read_to_string(path).unwrap();
        assert!(xml.contains("<title>Newer</title>"));
        assert!(!xml.contains("<title>Older</title>"));
    }
}
