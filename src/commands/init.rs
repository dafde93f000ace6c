//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::Site;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;
    fs::create_dir_all(target_dir.join("data/blog"))?;
    fs::create_dir_all(target_dir.join("data/authors"))?;
    fs::create_dir_all(target_dir.join("static"))?;

    let config_content = r#"# Site
title: My Blog
description: ''
author: John Doe
language: en

# URL
url: http://example.com
root: /

# Directory
data_dir: data
public_dir: public
posts_dir: blog
authors_dir: authors
tag_dir: tags
static_dir: static

# Writing
default_layout: PostLayout
render_drafts: false

# Date format (strftime)
date_format: '%B %-d, %Y'

# Pagination
per_page: 5
pagination_dir: page

# Deployment environment; plausible / simple analytics load only in production
environment: development

analytics:
  google_analytics_id: ''
  plausible_data_domain: ''
  simple_analytics: false

newsletter:
  provider: buttondown
  endpoint: ''
  api_key_env: NEWSLETTER_API_KEY

consent:
  cookie_name: cookie-consent
  expiry_days: 31

feed:
  enable: true
  path: feed.xml
  limit: 20
"#;

    fs::write(target_dir.join("_config.yml"), config_content)?;

    let now = chrono::Local::now();
    let sample_post = format!(
        r#"---
title: Hello World
date: {}
tags:
  - getting-started
authors:
  - default
summary: Your very first post.
layout: PostLayout
---

## Welcome

This is your first post. Edit or delete it, then start writing!

```bash
mdxblog new "My Next Post"
```
"#,
        now.format("%Y-%m-%d %H:%M:%S")
    );
    fs::write(target_dir.join("data/blog/hello-world.mdx"), sample_post)?;

    let default_author = r#"---
name: John Doe
avatar: /static/images/avatar.png
occupation: Writer
---

Things about me.
"#;
    fs::write(target_dir.join("data/authors/default.mdx"), default_author)?;

    let privacy = r#"---
title: Privacy Policy
layout: Policy
---

This site sets a single cookie to remember your analytics consent.
Analytics only run after you accept; revoke at any time and collection
stops.
"#;
    fs::write(target_dir.join("data/privacy.mdx"), privacy)?;

    Ok(())
}

/// Run the init command with an existing site instance
pub fn run(site: &Site) -> Result<()> {
    init_site(&site.base_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_scaffolds_site() {
        let tmp = TempDir::new().unwrap();
        init_site(tmp.path()).unwrap();

        assert!(tmp.path().join("_config.yml").is_file());
        assert!(tmp.path().join("data/blog/hello-world.mdx").is_file());
        assert!(tmp.path().join("data/authors/default.mdx").is_file());
        assert!(tmp.path().join("data/privacy.mdx").is_file());

        // the scaffolded config parses back
        let site = Site::new(tmp.path()).unwrap();
        assert_eq!(site.config.default_layout, "PostLayout");
        assert_eq!(site.config.consent.expiry_days, Some(31));
    }
}
