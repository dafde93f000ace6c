//! Markdown rendering with syntax highlighting and heading collection

use anyhow::Result;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::helpers::html_escape;
use crate::layout::toc::TocEntry;

/// Result of rendering one document
#[derive(Debug, Clone)]
pub struct RenderedContent {
    /// Rendered HTML
    pub html: String,
    /// Headings encountered, in document order
    pub headings: Vec<TocEntry>,
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: "base16-ocean.dark".to_string(),
        }
    }

    /// Create with a custom highlighting theme
    pub fn with_theme(theme: &str) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
        }
    }

    /// Render markdown to HTML, collecting headings for the TOC
    ///
    /// Headings get slugified `id` anchors. Fenced code blocks are
    /// highlighted and wrapped in the copy-affordance markup.
    pub fn render(&self, markdown: &str) -> Result<RenderedContent> {
        // Front-matter is handled separately in FrontMatter::parse()
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut headings: Vec<TocEntry> = Vec::new();

        let mut in_code = false;
        let mut code_lang: Option<String> = None;
        let mut code_buf = String::new();
        let mut heading: Option<(u8, String)> = None;
        // repeated heading texts get numbered anchors
        let mut used_ids: std::collections::HashMap<String, usize> = std::collections::HashMap::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    in_code = true;
                    code_lang = match kind {
                        CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                        _ => None,
                    };
                    code_buf.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    let block = self.code_block(&code_buf, code_lang.as_deref());
                    events.push(Event::Html(CowStr::from(block)));
                    in_code = false;
                    code_lang = None;
                }
                Event::Start(Tag::Heading { level, .. }) => {
                    heading = Some((level as u8, String::new()));
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some((depth, text)) = heading.take() {
                        let base = slug::slugify(&text);
                        let count = used_ids.entry(base.clone()).or_insert(0);
                        let id = if *count == 0 {
                            base.clone()
                        } else {
                            format!("{}-{}", base, count)
                        };
                        *count += 1;
                        events.push(Event::Html(CowStr::from(format!(
                            r##"<h{depth} id="{id}">{}</h{depth}>"##,
                            html_escape(&text)
                        ))));
                        headings.push(TocEntry {
                            depth,
                            value: text,
                            url: format!("#{}", id),
                        });
                    }
                }
                Event::Text(text) => {
                    if in_code {
                        code_buf.push_str(&text);
                    } else if let Some((_, buf)) = heading.as_mut() {
                        buf.push_str(&text);
                    } else {
                        events.push(Event::Text(text));
                    }
                }
                Event::Code(code) => {
                    if let Some((_, buf)) = heading.as_mut() {
                        buf.push_str(&code);
                    } else {
                        events.push(Event::Code(code));
                    }
                }
                other => {
                    // Inline markup inside headings is flattened to text
                    if !in_code && heading.is_none() {
                        events.push(other);
                    }
                }
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(RenderedContent {
            html: html_output,
            headings,
        })
    }

    /// Highlight a code block and wrap it with the copy affordance
    fn code_block(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next());

        let highlighted = theme
            .and_then(|theme| {
                highlighted_html_for_string(code, &self.syntax_set, syntax, theme).ok()
            })
            .unwrap_or_else(|| {
                format!(
                    r#"<pre><code class="language-{}">{}</code></pre>"#,
                    lang,
                    html_escape(code)
                )
            });

        // The copy button script reads the <pre> text content, so the
        // clipboard always receives the literal code
        format!(
            r#"<div class="code-block"><button class="copy-button" aria-label="Copy code">Copy</button>{}</div>"#,
            highlighted
        )
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let rendered = renderer.render("# Hello World\n\nThis is a test.").unwrap();
        assert!(rendered.html.contains(r##"<h1 id="hello-world">Hello World</h1>"##));
        assert!(rendered.html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_headings_collected_for_toc() {
        let renderer = MarkdownRenderer::new();
        let rendered = renderer
            .render("# Intro\n\n## Setup\n\n### Detail\n")
            .unwrap();
        let depths: Vec<u8> = rendered.headings.iter().map(|h| h.depth).collect();
        assert_eq!(depths, vec![1, 2, 3]);
        assert_eq!(rendered.headings[1].value, "Setup");
        assert_eq!(rendered.headings[1].url, "#setup");
    }

    #[test]
    fn test_code_block_wrapped_with_copy_button() {
        let renderer = MarkdownRenderer::new();
        let rendered = renderer.render("```rust\nfn main() {}\n```").unwrap();
        assert!(rendered.html.contains(r#"<div class="code-block">"#));
        assert!(rendered.html.contains(r#"<button class="copy-button""#));
        assert!(rendered.html.contains("main"));
    }

    #[test]
    fn test_duplicate_headings_get_unique_anchors() {
        let renderer = MarkdownRenderer::new();
        let rendered = renderer.render("## Intro\n\n## Intro\n\n## Intro\n").unwrap();
        let urls: Vec<&str> = rendered.headings.iter().map(|h| h.url.as_str()).collect();
        assert_eq!(urls, vec!["#intro", "#intro-1", "#intro-2"]);
        assert!(rendered.html.contains(r##"<h2 id="intro-1">"##));
    }

    #[test]
    fn test_heading_with_inline_code() {
        let renderer = MarkdownRenderer::new();
        let rendered = renderer.render("## Using `cargo`\n").unwrap();
        assert_eq!(rendered.headings[0].value, "Using cargo");
        assert_eq!(rendered.headings[0].url, "#using-cargo");
    }
}
