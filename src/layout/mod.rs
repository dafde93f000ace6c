//! Layout dispatch
//!
//! Every content document names a layout; the dispatcher resolves the name
//! against a closed set of layouts and renders the document with the shared
//! embed components (images, links, TOC, code copy affordance, newsletter
//! form). An unknown layout name is a fatal error carrying the attempted
//! name; there is no fallback layout.

pub mod components;
pub(crate) mod render;
pub mod toc;

use indexmap::IndexMap;
use thiserror::Error;

use crate::config::SiteConfig;
use crate::content::{Author, FrontMatter, Post};
use toc::TocEntry;

/// The closed set of layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    AuthorLayout,
    ListLayout,
    Policy,
    PostLayout,
    PostSimple,
}

impl Layout {
    /// All layouts, in registry order
    pub const ALL: [Layout; 5] = [
        Layout::AuthorLayout,
        Layout::ListLayout,
        Layout::Policy,
        Layout::PostLayout,
        Layout::PostSimple,
    ];

    /// The registry name of this layout
    pub fn name(&self) -> &'static str {
        match self {
            Layout::AuthorLayout => "AuthorLayout",
            Layout::ListLayout => "ListLayout",
            Layout::Policy => "Policy",
            Layout::PostLayout => "PostLayout",
            Layout::PostSimple => "PostSimple",
        }
    }

    /// The layout registry as name -> layout, in declaration order
    pub fn registry() -> IndexMap<&'static str, Layout> {
        Layout::ALL.iter().map(|l| (l.name(), *l)).collect()
    }

    /// Resolve a layout name
    ///
    /// Total over the registry; any other name fails deterministically.
    pub fn resolve(name: &str) -> Result<Layout, LayoutError> {
        Layout::registry()
            .get(name)
            .copied()
            .ok_or_else(|| LayoutError::UnknownLayout {
                name: name.to_string(),
            })
    }
}

/// Errors raised by layout resolution and rendering
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("cannot find layout module '{name}'")]
    UnknownLayout { name: String },

    #[error("invalid table-of-contents exclusion pattern '{pattern}': {source}")]
    TocPattern {
        pattern: String,
        source: regex::Error,
    },
}

/// Pagination state for list layouts
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub current: usize,
    pub total: usize,
}

/// Caller-supplied props passed through to the resolved layout
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderProps<'a> {
    /// Author details for the byline / author page
    pub authors: &'a [Author],
    /// Previous (older) post navigation target
    pub prev: Option<&'a Post>,
    /// Next (newer) post navigation target
    pub next: Option<&'a Post>,
    /// Table-of-contents entries of the rendered document
    pub toc: &'a [TocEntry],
    /// Posts to list (list layouts only)
    pub posts: &'a [Post],
    /// Pagination state (list layouts only)
    pub pagination: Option<Pagination>,
    /// Listing title override (list layouts only)
    pub title: Option<&'a str>,
}

/// Renders documents through the layout registry
pub struct LayoutDispatcher {
    config: SiteConfig,
}

impl LayoutDispatcher {
    /// Create a new dispatcher
    pub fn new(config: SiteConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Resolve `name` and render; the dynamic entry point
    pub fn render_named(
        &self,
        name: &str,
        content_html: &str,
        front_matter: &FrontMatter,
        props: &RenderProps,
    ) -> Result<String, LayoutError> {
        let layout = Layout::resolve(name)?;
        self.render(layout, content_html, front_matter, props)
    }

    /// Render compiled content through a resolved layout
    ///
    /// The content payload is already compiled to HTML by the markdown
    /// renderer; this only instantiates the layout around it.
    pub fn render(
        &self,
        layout: Layout,
        content_html: &str,
        front_matter: &FrontMatter,
        props: &RenderProps,
    ) -> Result<String, LayoutError> {
        let body = match layout {
            Layout::AuthorLayout => render::author_layout(&self.config, content_html, props),
            Layout::ListLayout => render::list_layout(&self.config, front_matter, props),
            Layout::Policy => render::policy(&self.config, content_html, front_matter),
            Layout::PostLayout => {
                render::post_layout(&self.config, content_html, front_matter, props)?
            }
            Layout::PostSimple => {
                render::post_simple(&self.config, content_html, front_matter, props)
            }
        };

        let title = front_matter
            .title
            .as_deref()
            .or(props.title)
            .unwrap_or(&self.config.title);

        Ok(render::page_shell(&self.config, title, &body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_total_over_registry() {
        for name in ["AuthorLayout", "ListLayout", "Policy", "PostLayout", "PostSimple"] {
            let layout = Layout::resolve(name).unwrap();
            assert_eq!(layout.name(), name);
        }
    }

    #[test]
    fn test_resolve_unknown_is_deterministic_and_carries_name() {
        for _ in 0..2 {
            let err = Layout::resolve("NewsletterLayout").unwrap_err();
            match err {
                LayoutError::UnknownLayout { ref name } => assert_eq!(name, "NewsletterLayout"),
                other => panic!("unexpected error: {}", other),
            }
            assert_eq!(
                err.to_string(),
                "cannot find layout module 'NewsletterLayout'"
            );
        }
    }

    #[test]
    fn test_registry_order_is_stable() {
        let names: Vec<&str> = Layout::registry().keys().copied().collect();
        assert_eq!(
            names,
            vec!["AuthorLayout", "ListLayout", "Policy", "PostLayout", "PostSimple"]
        );
    }

    #[test]
    fn test_render_named_unknown_fails() {
        let dispatcher = LayoutDispatcher::new(SiteConfig::default());
        let fm = FrontMatter::default();
        let err = dispatcher
            .render_named("Missing", "<p>body</p>", &fm, &RenderProps::default())
            .unwrap_err();
        assert!(err.to_string().contains("Missing"));
    }

    #[test]
    fn test_render_policy_wraps_content() {
        let dispatcher = LayoutDispatcher::new(SiteConfig::default());
        let fm = FrontMatter {
            title: Some("Privacy Policy".to_string()),
            ..Default::default()
        };
        let html = dispatcher
            .render(Layout::Policy, "<p>We store one cookie.</p>", &fm, &RenderProps::default())
            .unwrap();
        assert!(html.contains("<title>Privacy Policy"));
        assert!(html.contains("We store one cookie."));
    }
}
