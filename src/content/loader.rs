//! Content loader - loads posts and authors from the data directory

use anyhow::Result;
use chrono::Local;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::{Author, FrontMatter, MarkdownRenderer, Post};
use crate::helpers::count_words;
use crate::Site;

/// Words per minute for the reading-time estimate
const READING_SPEED_WPM: usize = 200;

/// Loads content from the data directory
pub struct ContentLoader<'a> {
    site: &'a Site,
    renderer: MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(site: &'a Site) -> Self {
        Self {
            site,
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Load all posts, newest first
    pub fn load_posts(&self) -> Result<Vec<Post>> {
        let posts_dir = self.site.data_dir.join(&self.site.config.posts_dir);
        if !posts_dir.exists() {
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();

        for entry in WalkDir::new(&posts_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && is_markdown_file(path) {
                match self.load_post(path) {
                    Ok(post) => {
                        if !post.draft || self.site.config.render_drafts {
                            posts.push(post);
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load post {:?}: {}", path, e);
                    }
                }
            }
        }

        // Sort by date descending (newest first)
        posts.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(posts)
    }

    /// Load a single post from a file
    fn load_post(&self, path: &Path) -> Result<Post> {
        let content = fs::read_to_string(path)?;
        let (fm, body) = FrontMatter::parse(&content)?;

        let metadata = fs::metadata(path)?;
        let file_modified = metadata
            .modified()
            .ok()
            .map(|t| chrono::DateTime::<Local>::from(t));

        let date = fm
            .parse_date()
            .unwrap_or_else(|| file_modified.unwrap_or_else(Local::now));
        let lastmod = fm.parse_lastmod();

        let title = fm.title.unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Untitled")
                .to_string()
        });

        let source = path
            .strip_prefix(&self.site.data_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        // Slug from front matter, falling back to the file name
        let slug = fm.slug.unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .map(slug::slugify)
                .unwrap_or_else(|| "untitled".to_string())
        });

        let post_path = format!("{}/", slug);
        let permalink = crate::helpers::full_url_for(&self.site.config, &post_path);

        let rendered = self.renderer.render(body)?;
        let word_count = count_words(&rendered.html);

        let mut post = Post::new(title, date, source);
        post.lastmod = lastmod;
        post.raw = body.to_string();
        post.content = rendered.html;
        post.headings = rendered.headings;
        post.summary = fm.summary;
        post.tags = fm.tags;
        post.authors = fm.authors;
        post.layout = fm
            .layout
            .unwrap_or_else(|| self.site.config.default_layout.clone());
        post.images = fm.images;
        post.canonical_url = fm.canonical_url;
        post.full_source = path.to_path_buf();
        post.path = post_path;
        post.permalink = permalink;
        post.draft = fm.draft;
        post.slug = slug;
        post.reading_minutes = word_count.div_ceil(READING_SPEED_WPM).max(1);
        post.extra = fm.extra;

        Ok(post)
    }

    /// Load all author profiles
    pub fn load_authors(&self) -> Result<Vec<Author>> {
        let authors_dir = self.site.data_dir.join(&self.site.config.authors_dir);
        if !authors_dir.exists() {
            return Ok(Vec::new());
        }

        let mut authors = Vec::new();

        for entry in WalkDir::new(&authors_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && is_markdown_file(path) {
                match self.load_author(path) {
                    Ok(author) => authors.push(author),
                    Err(e) => {
                        tracing::warn!("Failed to load author {:?}: {}", path, e);
                    }
                }
            }
        }

        authors.sort_by(|a, b| a.slug.cmp(&b.slug));

        Ok(authors)
    }

    /// Load a single author profile
    ///
    /// Author front matter is a flat attribute bag; fields the post
    /// front matter does not declare arrive through `extra`.
    fn load_author(&self, path: &Path) -> Result<Author> {
        let content = fs::read_to_string(path)?;
        let (fm, body) = FrontMatter::parse(&content)?;

        let slug = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("default")
            .to_string();

        let source = path
            .strip_prefix(&self.site.data_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        let field = |name: &str| -> Option<String> {
            fm.extra
                .get(name)
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
        };

        let name = field("name")
            .or(fm.title.clone())
            .unwrap_or_else(|| slug.clone());

        let rendered = self.renderer.render(body)?;

        let mut author = Author::new(name, slug, source);
        author.avatar = field("avatar");
        author.occupation = field("occupation");
        author.company = field("company");
        author.email = field("email");
        author.twitter = field("twitter");
        author.linkedin = field("linkedin");
        author.github = field("github");
        author.content = rendered.html;

        Ok(author)
    }
}

/// Check if a file is a markdown/MDX file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown" || e == "mdx")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn site_in(dir: &Path) -> Site {
        fs::create_dir_all(dir.join("data/blog")).unwrap();
        fs::create_dir_all(dir.join("data/authors")).unwrap();
        Site::new(dir).unwrap()
    }

    #[test]
    fn test_load_posts_sorted_and_drafts_skipped() {
        let tmp = TempDir::new().unwrap();
        let site = site_in(tmp.path());

        fs::write(
            tmp.path().join("data/blog/older.mdx"),
            "---\ntitle: Older\ndate: 2024-01-01\n---\nBody.\n",
        )
        .unwrap();
        fs::write(
            tmp.path().join("data/blog/newer.mdx"),
            "---\ntitle: Newer\ndate: 2024-02-01\n---\nBody.\n",
        )
        .unwrap();
        fs::write(
            tmp.path().join("data/blog/hidden.mdx"),
            "---\ntitle: Hidden\ndate: 2024-03-01\ndraft: true\n---\nBody.\n",
        )
        .unwrap();

        let loader = ContentLoader::new(&site);
        let posts = loader.load_posts().unwrap();

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "Newer");
        assert_eq!(posts[1].title, "Older");
    }

    #[test]
    fn test_post_slug_and_reading_time() {
        let tmp = TempDir::new().unwrap();
        let site = site_in(tmp.path());

        fs::write(
            tmp.path().join("data/blog/My First Post.mdx"),
            "---\ntitle: My First Post\ndate: 2024-01-01\n---\nShort body.\n",
        )
        .unwrap();

        let loader = ContentLoader::new(&site);
        let posts = loader.load_posts().unwrap();

        assert_eq!(posts[0].slug, "my-first-post");
        assert_eq!(posts[0].path, "my-first-post/");
        assert_eq!(posts[0].reading_minutes, 1);
    }

    #[test]
    fn test_load_author_profile() {
        let tmp = TempDir::new().unwrap();
        let site = site_in(tmp.path());

        fs::write(
            tmp.path().join("data/authors/default.mdx"),
            "---\nname: Jane Doe\navatar: /static/avatar.png\ntwitter: https://twitter.com/jane\n---\nJane writes about refactoring.\n",
        )
        .unwrap();

        let loader = ContentLoader::new(&site);
        let authors = loader.load_authors().unwrap();

        assert_eq!(authors.len(), 1);
        assert_eq!(authors[0].name, "Jane Doe");
        assert_eq!(authors[0].slug, "default");
        assert_eq!(authors[0].avatar.as_deref(), Some("/static/avatar.png"));
        assert!(authors[0].content.contains("refactoring"));
    }
}
