//! Table-of-contents filtering and rendering
//!
//! A TOC entry is a heading's depth, display text and anchor target.
//! Entries are filtered by a depth range and an exclusion pattern before
//! rendering, and optionally wrapped in a collapsible disclosure widget.

use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

use crate::helpers::html_escape;
use crate::layout::LayoutError;

/// A single table-of-contents entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Heading depth (1-6)
    pub depth: u8,
    /// Display text
    pub value: String,
    /// Anchor target, e.g. "#setup"
    pub url: String,
}

/// Options controlling TOC filtering and rendering
#[derive(Debug, Clone)]
pub struct TocOptions {
    /// Smallest heading depth to include
    pub from_heading: u8,
    /// Largest heading depth to include
    pub to_heading: u8,
    /// Heading texts to exclude, compiled into a case-insensitive
    /// whole-match pattern
    pub exclude: Vec<String>,
    /// Entries at or beyond this depth are indented
    pub indent_depth: u8,
    /// Wrap the list in a collapsible <details> disclosure
    pub as_disclosure: bool,
}

impl Default for TocOptions {
    fn default() -> Self {
        Self {
            from_heading: 1,
            to_heading: 6,
            exclude: Vec::new(),
            indent_depth: 3,
            as_disclosure: false,
        }
    }
}

impl TocOptions {
    /// Exclude a single heading text
    pub fn exclude_one(mut self, value: &str) -> Self {
        self.exclude.push(value.to_string());
        self
    }
}

/// Filter TOC entries by depth range and exclusion pattern
pub fn filter_toc(entries: &[TocEntry], options: &TocOptions) -> Result<Vec<TocEntry>, LayoutError> {
    let exclude_re = if options.exclude.is_empty() {
        None
    } else {
        let pattern = format!("^({})$", options.exclude.join("|"));
        let re = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| LayoutError::TocPattern {
                pattern,
                source: e,
            })?;
        Some(re)
    };

    Ok(entries
        .iter()
        .filter(|e| e.depth >= options.from_heading && e.depth <= options.to_heading)
        .filter(|e| {
            exclude_re
                .as_ref()
                .map(|re| !re.is_match(&e.value))
                .unwrap_or(true)
        })
        .cloned()
        .collect())
}

/// Render filtered TOC entries as an HTML list
pub fn render_toc(entries: &[TocEntry], options: &TocOptions) -> Result<String, LayoutError> {
    let filtered = filter_toc(entries, options)?;
    if filtered.is_empty() {
        return Ok(String::new());
    }

    let mut list = String::from(r#"<ul class="toc">"#);
    for entry in &filtered {
        let class = if entry.depth >= options.indent_depth {
            r#" class="toc-indent""#
        } else {
            ""
        };
        list.push_str(&format!(
            r#"<li{}><a href="{}">{}</a></li>"#,
            class,
            entry.url,
            html_escape(&entry.value)
        ));
    }
    list.push_str("</ul>");

    if options.as_disclosure {
        Ok(format!(
            "<details open><summary>Table of Contents</summary>{}</details>",
            list
        ))
    } else {
        Ok(list)
    }
}
