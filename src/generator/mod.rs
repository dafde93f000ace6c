//! Generator module - renders the site through the layout registry
//!
//! Every output page goes through the same pipeline: compiled content
//! plus front matter into the layout dispatcher, shell around the body,
//! file under `public/`. The feed is not written here; the build command
//! publishes it after page generation, so listing posts never mutates
//! the output tree as a side effect.

pub mod feed;

use anyhow::Result;
use indexmap::IndexMap;
use std::fs;
use walkdir::WalkDir;

use crate::content::{Author, FrontMatter, MarkdownRenderer, Post};
use crate::layout::{Layout, LayoutDispatcher, Pagination, RenderProps};
use crate::Site;

/// Static site generator over the layout registry
pub struct Generator {
    site: Site,
    dispatcher: LayoutDispatcher,
}

impl Generator {
    /// Create a new generator
    pub fn new(site: &Site) -> Self {
        Self {
            site: site.clone(),
            dispatcher: LayoutDispatcher::new(site.config.clone()),
        }
    }

    /// Generate the entire site
    pub fn generate(&self, posts: &[Post], authors: &[Author]) -> Result<()> {
        fs::create_dir_all(&self.site.public_dir)?;

        self.copy_static_assets()?;

        self.generate_index_pages(posts, authors)?;
        self.generate_archive_page(posts, authors)?;
        self.generate_post_pages(posts, authors)?;
        self.generate_author_pages(authors)?;
        self.generate_policy_page()?;
        self.generate_tag_pages(posts, authors)?;
        self.generate_sitemap(posts)?;

        Ok(())
    }

    /// Write one rendered page as `<dir>/index.html` under public
    fn write_page(&self, dir: &str, html: &str) -> Result<()> {
        let output_path = self
            .site
            .public_dir
            .join(dir.trim_start_matches('/'))
            .join("index.html");
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_path, html)?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }

    /// Generate the paginated home listing
    fn generate_index_pages(&self, posts: &[Post], authors: &[Author]) -> Result<()> {
        // a misconfigured per_page of 0 falls back to one post per page
        let per_page = self.site.config.per_page.max(1);
        let total_pages = posts.len().div_ceil(per_page).max(1);

        for page_num in 1..=total_pages {
            let start = (page_num - 1) * per_page;
            let end = (start + per_page).min(posts.len());

            let props = RenderProps {
                authors,
                posts: &posts[start..end],
                pagination: Some(Pagination {
                    current: page_num,
                    total: total_pages,
                }),
                title: Some("Latest"),
                ..Default::default()
            };

            let html = self.dispatcher.render(
                Layout::ListLayout,
                "",
                &FrontMatter::default(),
                &props,
            )?;

            let dir = if page_num == 1 {
                String::new()
            } else {
                format!("{}/{}", self.site.config.pagination_dir, page_num)
            };
            self.write_page(&dir, &html)?;
        }

        Ok(())
    }

    /// Generate the full `posts/` listing
    fn generate_archive_page(&self, posts: &[Post], authors: &[Author]) -> Result<()> {
        let props = RenderProps {
            authors,
            posts,
            title: Some("All Posts"),
            ..Default::default()
        };
        let html = self.dispatcher.render(
            Layout::ListLayout,
            "",
            &FrontMatter::default(),
            &props,
        )?;
        self.write_page("posts", &html)
    }

    /// Generate individual post pages
    ///
    /// Each post dispatches on its own layout name; an unknown name
    /// aborts generation with the attempted name in the error.
    fn generate_post_pages(&self, posts: &[Post], authors: &[Author]) -> Result<()> {
        for post in posts {
            let byline: Vec<Author> = post
                .authors
                .iter()
                .filter_map(|slug| authors.iter().find(|a| &a.slug == slug))
                .cloned()
                .collect();

            let props = RenderProps {
                authors: &byline,
                prev: post.prev(posts),
                next: post.next(posts),
                toc: &post.headings,
                ..Default::default()
            };

            let html = self.dispatcher.render_named(
                &post.layout,
                &post.content,
                &post.front_matter(),
                &props,
            )?;
            self.write_page(&post.path, &html)?;
        }

        tracing::info!("Generated {} post pages", posts.len());
        Ok(())
    }

    /// Generate author profile pages
    ///
    /// The default author lands at `about/`, additional authors at
    /// `about/<slug>/`.
    fn generate_author_pages(&self, authors: &[Author]) -> Result<()> {
        for author in authors {
            let one = std::slice::from_ref(author);
            let props = RenderProps {
                authors: one,
                title: Some(&author.name),
                ..Default::default()
            };

            let html = self.dispatcher.render(
                Layout::AuthorLayout,
                &author.content,
                &FrontMatter::default(),
                &props,
            )?;

            let dir = if author.slug == "default" {
                "about".to_string()
            } else {
                format!("about/{}", author.slug)
            };
            self.write_page(&dir, &html)?;
        }

        Ok(())
    }

    /// Generate the privacy policy page from `data/privacy.md[x]`
    fn generate_policy_page(&self) -> Result<()> {
        let source = ["privacy.mdx", "privacy.md"]
            .iter()
            .map(|name| self.site.data_dir.join(name))
            .find(|path| path.exists());

        let Some(source) = source else {
            tracing::debug!("No privacy document found, skipping policy page");
            return Ok(());
        };

        let content = fs::read_to_string(&source)?;
        let (fm, body) = FrontMatter::parse(&content)?;
        let rendered = MarkdownRenderer::new().render(body)?;

        let layout = match &fm.layout {
            Some(name) => Layout::resolve(name)?,
            None => Layout::Policy,
        };
        let html = self
            .dispatcher
            .render(layout, &rendered.html, &fm, &RenderProps::default())?;
        self.write_page("privacy", &html)
    }

    /// Generate per-tag listing pages
    fn generate_tag_pages(&self, posts: &[Post], authors: &[Author]) -> Result<()> {
        // Group posts by tag, first-seen order
        let mut tags_map: IndexMap<String, Vec<Post>> = IndexMap::new();
        for post in posts {
            for tag in &post.tags {
                if tag.trim().is_empty() {
                    continue;
                }
                tags_map.entry(tag.clone()).or_default().push(post.clone());
            }
        }

        for (tag, tag_posts) in &tags_map {
            let tag_slug = slug::slugify(tag);
            if tag_slug.is_empty() {
                continue;
            }

            let props = RenderProps {
                authors,
                posts: tag_posts,
                title: Some(tag),
                ..Default::default()
            };
            let html = self.dispatcher.render(
                Layout::ListLayout,
                "",
                &FrontMatter::default(),
                &props,
            )?;
            self.write_page(
                &format!("{}/{}", self.site.config.tag_dir, tag_slug),
                &html,
            )?;
        }

        tracing::info!("Generated {} tag pages", tags_map.len());
        Ok(())
    }

    /// Generate sitemap.xml
    fn generate_sitemap(&self, posts: &[Post]) -> Result<()> {
        let mut sitemap = String::new();
        sitemap.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        sitemap.push('\n');
        sitemap.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
        sitemap.push('\n');

        let mut push_url = |loc: &str, lastmod: Option<String>| {
            sitemap.push_str("  <url>\n");
            sitemap.push_str(&format!(
                "    <loc>{}</loc>\n",
                crate::helpers::escape_xml(loc)
            ));
            if let Some(lastmod) = lastmod {
                sitemap.push_str(&format!("    <lastmod>{}</lastmod>\n", lastmod));
            }
            sitemap.push_str("  </url>\n");
        };

        for path in ["", "posts/", "privacy/"] {
            push_url(&crate::helpers::full_url_for(&self.site.config, path), None);
        }
        for post in posts {
            let lastmod = post.lastmod.unwrap_or(post.date);
            push_url(
                &post.permalink,
                Some(lastmod.format("%Y-%m-%d").to_string()),
            );
        }

        sitemap.push_str("</urlset>\n");

        let output_path = self.site.public_dir.join("sitemap.xml");
        fs::write(&output_path, sitemap)?;
        tracing::info!("Generated sitemap.xml");

        Ok(())
    }

    /// Copy static assets into the public directory
    fn copy_static_assets(&self) -> Result<()> {
        let static_dir = self.site.base_dir.join(&self.site.config.static_dir);
        if !static_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(&static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() {
                let relative = path.strip_prefix(&static_dir)?;
                let dest = self
                    .site
                    .public_dir
                    .join(&self.site.config.static_dir)
                    .join(relative);
                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(path, &dest)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentLoader;
    use std::path::Path;
    use tempfile::TempDir;

    fn site_with_content(dir: &Path) -> Site {
        fs::create_dir_all(dir.join("data/blog")).unwrap();
        fs::create_dir_all(dir.join("data/authors")).unwrap();
        fs::write(
            dir.join("data/blog/first.mdx"),
            "---\ntitle: First Post\ndate: 2024-01-01\ntags:\n  - rust\nauthors:\n  - default\nsummary: The first one.\n---\n## Intro\n\nHello.\n",
        )
        .unwrap();
        fs::write(
            dir.join("data/blog/second.mdx"),
            "---\ntitle: Second Post\ndate: 2024-02-01\ntags:\n  - rust\n---\nBody.\n",
        )
        .unwrap();
        fs::write(
            dir.join("data/authors/default.mdx"),
            "---\nname: Jane Doe\n---\nBio.\n",
        )
        .unwrap();
        fs::write(
            dir.join("data/privacy.mdx"),
            "---\ntitle: Privacy Policy\nlayout: Policy\n---\nWe store one cookie.\n",
        )
        .unwrap();
        Site::new(dir).unwrap()
    }

    #[test]
    fn test_generate_site_tree() {
        let tmp = TempDir::new().unwrap();
        let site = site_with_content(tmp.path());

        let loader = ContentLoader::new(&site);
        let posts = loader.load_posts().unwrap();
        let authors = loader.load_authors().unwrap();

        Generator::new(&site).generate(&posts, &authors).unwrap();

        let public = &site.public_dir;
        assert!(public.join("index.html").is_file());
        assert!(public.join("posts/index.html").is_file());
        // slugs come from the file stems, not the titles
        assert!(public.join("first/index.html").is_file());
        assert!(public.join("second/index.html").is_file());
        assert!(public.join("about/index.html").is_file());
        assert!(public.join("privacy/index.html").is_file());
        assert!(public.join("tags/rust/index.html").is_file());
        assert!(public.join("sitemap.xml").is_file());

        // the page generator never writes the feed itself; the build
        // command publishes it after generation
        assert!(!public.join("feed.xml").exists());

        let post_html = fs::read_to_string(public.join("first/index.html")).unwrap();
        assert!(post_html.contains("First Post"));
        assert!(post_html.contains("Jane Doe"));
        assert!(post_html.contains("cookie-consent"));
    }

    #[test]
    fn test_per_page_zero_paginates_one_per_page() {
        let tmp = TempDir::new().unwrap();
        let mut site = site_with_content(tmp.path());
        site.config.per_page = 0;

        let loader = ContentLoader::new(&site);
        let posts = loader.load_posts().unwrap();
        let authors = loader.load_authors().unwrap();

        Generator::new(&site).generate(&posts, &authors).unwrap();

        assert!(site.public_dir.join("index.html").is_file());
        assert!(site.public_dir.join("page/2/index.html").is_file());
    }

    #[test]
    fn test_unknown_layout_aborts_generation() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("data/blog")).unwrap();
        fs::write(
            tmp.path().join("data/blog/odd.mdx"),
            "---\ntitle: Odd\ndate: 2024-01-01\nlayout: FancyLayout\n---\nBody.\n",
        )
        .unwrap();
        let site = Site::new(tmp.path()).unwrap();

        let loader = ContentLoader::new(&site);
        let posts = loader.load_posts().unwrap();

        let err = Generator::new(&site)
            .generate(&posts, &[])
            .unwrap_err();
        assert!(err.to_string().contains("FancyLayout"));
    }

}
