//! Create a new post

use anyhow::Result;
use std::fs;

use crate::layout::Layout;
use crate::Site;

/// Create a new post under the posts directory
///
/// The layout name, when given, is validated against the registry up
/// front so a typo fails here instead of at generation time.
pub fn run(site: &Site, title: &str, layout: Option<&str>) -> Result<()> {
    let layout = match layout {
        Some(name) => Layout::resolve(name)?.name(),
        None => site.config.default_layout.as_str(),
    };

    let posts_dir = site.data_dir.join(&site.config.posts_dir);
    fs::create_dir_all(&posts_dir)?;

    let slug = slug::slugify(title);
    let file_path = posts_dir.join(format!("{}.mdx", slug));
    if file_path.exists() {
        anyhow::bail!("Post already exists: {:?}", file_path);
    }

    let now = chrono::Local::now();
    let content = format!(
        r#"---
title: {title}
date: {date}
tags: []
draft: false
summary: ''
layout: {layout}
---

"#,
        title = title,
        date = now.format("%Y-%m-%d %H:%M:%S"),
        layout = layout,
    );

    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);
    println!("Created new post: {:?}", file_path);

    Ok(())
}
