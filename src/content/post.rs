//! Post and Author models

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::layout::toc::TocEntry;

/// A blog post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Post title
    pub title: String,

    /// Publication date
    pub date: DateTime<Local>,

    /// Last modified date
    pub lastmod: Option<DateTime<Local>>,

    /// Raw markdown content
    pub raw: String,

    /// Rendered HTML content
    pub content: String,

    /// Short summary shown in listings
    pub summary: Option<String>,

    /// Post tags
    pub tags: Vec<String>,

    /// Author slugs referenced from front matter
    pub authors: Vec<String>,

    /// Layout name to dispatch on
    pub layout: String,

    /// Cover / social images
    pub images: Vec<String>,

    /// Canonical URL override
    pub canonical_url: Option<String>,

    /// Source file path (relative)
    pub source: String,

    /// Full source file path
    pub full_source: PathBuf,

    /// URL path (without root)
    pub path: String,

    /// Full permalink URL
    pub permalink: String,

    /// Whether the post is a draft
    pub draft: bool,

    /// Slug (URL-friendly name)
    pub slug: String,

    /// Headings collected during rendering, for the table of contents
    pub headings: Vec<TocEntry>,

    /// Estimated reading time in minutes
    pub reading_minutes: usize,

    /// Custom front-matter fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Post {
    /// Create a new post with minimal required fields
    pub fn new(title: String, date: DateTime<Local>, source: String) -> Self {
        let slug = slug::slugify(&title);
        Self {
            title,
            date,
            lastmod: None,
            raw: String::new(),
            content: String::new(),
            summary: None,
            tags: Vec::new(),
            authors: Vec::new(),
            layout: "PostLayout".to_string(),
            images: Vec::new(),
            canonical_url: None,
            source: source.clone(),
            full_source: PathBuf::from(&source),
            path: String::new(),
            permalink: String::new(),
            draft: false,
            slug,
            headings: Vec::new(),
            reading_minutes: 0,
            extra: HashMap::new(),
        }
    }

    /// Reconstruct the front-matter view the layouts render from
    pub fn front_matter(&self) -> crate::content::FrontMatter {
        crate::content::FrontMatter {
            title: Some(self.title.clone()),
            date: Some(self.date.format("%Y-%m-%d %H:%M:%S").to_string()),
            lastmod: self
                .lastmod
                .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string()),
            draft: self.draft,
            summary: self.summary.clone(),
            tags: self.tags.clone(),
            authors: self.authors.clone(),
            images: self.images.clone(),
            layout: Some(self.layout.clone()),
            slug: Some(self.slug.clone()),
            canonical_url: self.canonical_url.clone(),
            extra: self.extra.clone(),
        }
    }

    /// Get the previous (older) post in a newest-first list
    pub fn prev<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.source == self.source)?;
        posts.get(pos + 1)
    }

    /// Get the next (newer) post in a newest-first list
    pub fn next<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.source == self.source)?;
        if pos > 0 {
            Some(&posts[pos - 1])
        } else {
            None
        }
    }
}

/// An author profile from the authors directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    /// Display name
    pub name: String,

    /// Slug the posts reference (file stem)
    pub slug: String,

    /// Avatar image path
    pub avatar: Option<String>,

    pub occupation: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub twitter: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,

    /// Rendered biography HTML
    pub content: String,

    /// Source file path (relative)
    pub source: String,
}

impl Author {
    /// Create a new author with minimal required fields
    pub fn new(name: String, slug: String, source: String) -> Self {
        Self {
            name,
            slug,
            avatar: None,
            occupation: None,
            company: None,
            email: None,
            twitter: None,
            linkedin: None,
            github: None,
            content: String::new(),
            source,
        }
    }
}
