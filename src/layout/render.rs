//! The layout renderers
//!
//! One function per registry entry, plus the page shell shared by all of
//! them. Markup mirrors the blog's presentation: byline with author
//! avatars, tag chips, prev/next navigation, a collapsible TOC on full
//! posts and the newsletter form in the shell footer.

use crate::config::SiteConfig;
use crate::consent;
use crate::content::{Author, FrontMatter};
use crate::helpers::{html_escape, time_tag, url_for};
use crate::layout::components;
use crate::layout::toc::{render_toc, TocOptions};
use crate::layout::{LayoutError, RenderProps};

/// Wrap a rendered body in the site chrome
///
/// Generated pages embed the consent prompt; the serving layer swaps in
/// the analytics embeds once the persisted flag reads true.
pub fn page_shell(config: &SiteConfig, title: &str, body: &str) -> String {
    let home = url_for(config, "");
    let nav = [
        ("Blog", home.clone()),
        ("All Posts", url_for(config, "posts/")),
        ("Privacy Policy", url_for(config, "privacy/")),
    ]
    .iter()
    .map(|(text, href)| format!(r#"<a href="{}">{}</a>"#, href, text))
    .collect::<Vec<_>>()
    .join("\n      ");

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title} - {site}</title>
  <meta name="description" content="{description}">
  <link rel="alternate" type="application/rss+xml" title="{site}" href="{feed}">
</head>
<body>
  <header>
    <a class="site-title" href="{home}">{site}</a>
    <nav>
      {nav}
    </nav>
  </header>
  <main>
{body}
  </main>
  <footer>
    {newsletter}
    <p>&copy; {site}</p>
  </footer>
{consent}
{copy_script}
{newsletter_script}
</body>
</html>
"#,
        lang = config.language,
        title = html_escape(title),
        site = html_escape(&config.title),
        description = html_escape(&config.description),
        feed = url_for(config, &config.feed.path),
        home = home,
        nav = nav,
        body = body,
        newsletter = components::newsletter_form(config),
        consent = consent::consent_region(),
        copy_script = components::copy_script(),
        newsletter_script = components::newsletter_script(),
    )
}

/// Byline with avatars and twitter handles
fn byline(authors: &[Author]) -> String {
    if authors.is_empty() {
        return String::new();
    }

    let items: Vec<String> = authors
        .iter()
        .map(|author| {
            let avatar = author
                .avatar
                .as_deref()
                .map(|src| components::image(src, "avatar"))
                .unwrap_or_default();
            let twitter = author
                .twitter
                .as_deref()
                .map(|href| {
                    let handle = href.replace("https://twitter.com/", "@");
                    components::link(href, &handle)
                })
                .unwrap_or_default();
            format!(
                r#"<li class="author">{}<span class="author-name">{}</span>{}</li>"#,
                avatar,
                html_escape(&author.name),
                twitter
            )
        })
        .collect();

    format!(r#"<ul class="byline">{}</ul>"#, items.join(""))
}

/// Prev/next navigation between posts
fn post_nav(config: &SiteConfig, props: &RenderProps) -> String {
    let mut nav = String::new();
    if let Some(prev) = props.prev {
        nav.push_str(&format!(
            r#"<a class="nav-prev" href="{}">&larr; {}</a>"#,
            url_for(config, &prev.path),
            html_escape(&prev.title)
        ));
    }
    if let Some(next) = props.next {
        nav.push_str(&format!(
            r#"<a class="nav-next" href="{}">{} &rarr;</a>"#,
            url_for(config, &next.path),
            html_escape(&next.title)
        ));
    }
    if nav.is_empty() {
        nav
    } else {
        format!(r#"<nav class="post-nav">{}</nav>"#, nav)
    }
}

fn display_date(config: &SiteConfig, fm: &FrontMatter) -> String {
    fm.parse_date()
        .map(|d| {
            format!(
                r#"<time datetime="{}">{}</time>"#,
                d.format("%Y-%m-%d"),
                d.format(&config.date_format)
            )
        })
        .unwrap_or_default()
}

/// Full post presentation: byline, TOC, tags, navigation
pub fn post_layout(
    config: &SiteConfig,
    content_html: &str,
    fm: &FrontMatter,
    props: &RenderProps,
) -> Result<String, LayoutError> {
    let title = fm.title.as_deref().unwrap_or("Untitled");

    let toc_options = TocOptions {
        as_disclosure: true,
        ..Default::default()
    };
    let toc = render_toc(props.toc, &toc_options)?;

    let tags: Vec<String> = fm
        .tags
        .iter()
        .map(|t| components::tag_chip(config, t))
        .collect();

    Ok(format!(
        r#"<article class="post">
  <header>
    <h1>{title}</h1>
    {date}
    {byline}
  </header>
  {toc}
  <div class="prose">
{content}
  </div>
  <div class="tags">{tags}</div>
  {nav}
</article>"#,
        title = html_escape(title),
        date = display_date(config, fm),
        byline = byline(props.authors),
        toc = toc,
        content = content_html,
        tags = tags.join(""),
        nav = post_nav(config, props),
    ))
}

/// Stripped-down post presentation: no byline, no TOC, no tags
pub fn post_simple(
    config: &SiteConfig,
    content_html: &str,
    fm: &FrontMatter,
    props: &RenderProps,
) -> String {
    let title = fm.title.as_deref().unwrap_or("Untitled");
    format!(
        r#"<article class="post post-simple">
  <header>
    <h1>{title}</h1>
    {date}
  </header>
  <div class="prose">
{content}
  </div>
  {nav}
</article>"#,
        title = html_escape(title),
        date = display_date(config, fm),
        content = content_html,
        nav = post_nav(config, props),
    )
}

/// Author profile card plus rendered biography
pub fn author_layout(config: &SiteConfig, content_html: &str, props: &RenderProps) -> String {
    let card = props
        .authors
        .first()
        .map(|author| {
            let avatar = author
                .avatar
                .as_deref()
                .map(|src| components::image(&url_for(config, src), &author.name))
                .unwrap_or_default();
            let mut details = Vec::new();
            if let Some(occupation) = &author.occupation {
                details.push(html_escape(occupation));
            }
            if let Some(company) = &author.company {
                details.push(html_escape(company));
            }
            let mut links = Vec::new();
            if let Some(email) = &author.email {
                links.push(components::link(&format!("mailto:{}", email), "Email"));
            }
            for (label, href) in [
                ("Twitter", &author.twitter),
                ("LinkedIn", &author.linkedin),
                ("GitHub", &author.github),
            ] {
                if let Some(href) = href {
                    links.push(components::link(href, label));
                }
            }
            format!(
                r#"<div class="author-card">
    {avatar}
    <h1>{name}</h1>
    <p>{details}</p>
    <div class="author-links">{links}</div>
  </div>"#,
                avatar = avatar,
                name = html_escape(&author.name),
                details = details.join(" &middot; "),
                links = links.join(" "),
            )
        })
        .unwrap_or_default();

    format!(
        r#"<section class="about">
  {card}
  <div class="prose">
{content}
  </div>
</section>"#,
        card = card,
        content = content_html,
    )
}

/// Privacy-policy style prose page, with the consent-revoke affordance
pub fn policy(config: &SiteConfig, content_html: &str, fm: &FrontMatter) -> String {
    let title = fm.title.as_deref().unwrap_or(&config.title);
    format!(
        r#"<section class="policy">
  <h1>{title}</h1>
  <div class="prose">
{content}
  </div>
  <form class="consent-revoke" method="post" action="/consent/revoke">
    <button type="submit">Revoke analytics consent</button>
  </form>
</section>"#,
        title = html_escape(title),
        content = content_html,
    )
}

/// Listing of posts with summaries, bylines and pagination
pub fn list_layout(config: &SiteConfig, fm: &FrontMatter, props: &RenderProps) -> String {
    let title = fm
        .title
        .as_deref()
        .or(props.title)
        .unwrap_or("Latest");

    let mut items = String::new();
    if props.posts.is_empty() {
        items.push_str("<p>No posts found.</p>");
    }
    for post in props.posts {
        let href = url_for(config, &post.path);
        let tags: Vec<String> = post
            .tags
            .iter()
            .map(|t| components::tag_chip(config, t))
            .collect();
        let summary = post
            .summary
            .as_deref()
            .map(html_escape)
            .unwrap_or_default();
        let cover = post
            .images
            .first()
            .map(|src| {
                format!(
                    r#"<a href="{}">{}</a>"#,
                    href,
                    components::image(src, &post.title)
                )
            })
            .unwrap_or_default();

        items.push_str(&format!(
            r#"<li class="post-item">
    <article>
      {cover}
      <h3><a href="{href}">{title}</a></h3>
      <div class="tags">{tags}</div>
      <p>{summary} <a href="{href}" aria-label="Link to {title}">Read more &rarr;</a></p>
      {time}
    </article>
  </li>"#,
            cover = cover,
            href = href,
            title = html_escape(&post.title),
            tags = tags.join(""),
            summary = summary,
            time = time_tag(&post.date, None),
        ));
    }

    let pagination = props
        .pagination
        .filter(|p| p.total > 1)
        .map(|p| {
            let mut nav = String::new();
            if p.current > 1 {
                let href = if p.current == 2 {
                    url_for(config, "")
                } else {
                    url_for(
                        config,
                        &format!("{}/{}/", config.pagination_dir, p.current - 1),
                    )
                };
                nav.push_str(&format!(r#"<a href="{}">Previous</a>"#, href));
            }
            nav.push_str(&format!("<span>{} of {}</span>", p.current, p.total));
            if p.current < p.total {
                let href = url_for(
                    config,
                    &format!("{}/{}/", config.pagination_dir, p.current + 1),
                );
                nav.push_str(&format!(r#"<a href="{}">Next</a>"#, href));
            }
            format!(r#"<nav class="pagination">{}</nav>"#, nav)
        })
        .unwrap_or_default();

    format!(
        r#"<section class="listing">
  <h1>{title}</h1>
  <ul class="post-list">
{items}
  </ul>
  {pagination}
</section>"#,
        title = html_escape(title),
        items = items,
        pagination = pagination,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Post;
    use crate::layout::Pagination;
    use chrono::{Local, TimeZone};

    fn config() -> SiteConfig {
        SiteConfig::default()
    }

    fn post(title: &str) -> Post {
        let date = Local.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let mut p = Post::new(title.to_string(), date, format!("blog/{}.md", title));
        p.path = format!("{}/", p.slug);
        p.summary = Some("A summary.".to_string());
        p.tags = vec!["rust".to_string()];
        p
    }

    #[test]
    fn test_post_layout_includes_toc_and_nav() {
        let prev = post("Older Post");
        let fm = FrontMatter {
            title: Some("Current".to_string()),
            date: Some("2024-01-15".to_string()),
            tags: vec!["rust".to_string()],
            ..Default::default()
        };
        let toc = vec![crate::layout::toc::TocEntry {
            depth: 2,
            value: "Setup".to_string(),
            url: "#setup".to_string(),
        }];
        let props = RenderProps {
            prev: Some(&prev),
            toc: &toc,
            ..Default::default()
        };
        let html = post_layout(&config(), "<p>Body</p>", &fm, &props).unwrap();
        assert!(html.contains("<h1>Current</h1>"));
        assert!(html.contains("Table of Contents"));
        assert!(html.contains(r##"href="#setup""##));
        assert!(html.contains("Older Post"));
        assert!(html.contains("January 15, 2024"));
    }

    #[test]
    fn test_post_simple_has_no_toc() {
        let fm = FrontMatter {
            title: Some("Simple".to_string()),
            ..Default::default()
        };
        let html = post_simple(&config(), "<p>Body</p>", &fm, &RenderProps::default());
        assert!(!html.contains("Table of Contents"));
        assert!(html.contains("post-simple"));
    }

    #[test]
    fn test_list_layout_pagination() {
        let posts = vec![post("First"), post("Second")];
        let props = RenderProps {
            posts: &posts,
            pagination: Some(Pagination {
                current: 2,
                total: 3,
            }),
            title: Some("All Posts"),
            ..Default::default()
        };
        let html = list_layout(&config(), &FrontMatter::default(), &props);
        assert!(html.contains("<h1>All Posts</h1>"));
        assert!(html.contains("Read more"));
        assert!(html.contains(r#"<a href="/">Previous</a>"#));
        assert!(html.contains(r#"<a href="/page/3/">Next</a>"#));
    }

    #[test]
    fn test_author_layout_card() {
        let mut author = Author::new(
            "Jane Doe".to_string(),
            "default".to_string(),
            "authors/default.mdx".to_string(),
        );
        author.avatar = Some("/static/avatar.png".to_string());
        author.occupation = Some("Engineer".to_string());
        author.github = Some("https://github.com/jane".to_string());
        let authors = vec![author];
        let props = RenderProps {
            authors: &authors,
            ..Default::default()
        };
        let html = author_layout(&config(), "<p>Bio</p>", &props);
        assert!(html.contains("Jane Doe"));
        assert!(html.contains("Engineer"));
        assert!(html.contains(r#"href="https://github.com/jane""#));

        // the avatar URL is resolved against the site root
        let mut rooted = config();
        rooted.root = "/blog/".to_string();
        let html = author_layout(&rooted, "<p>Bio</p>", &props);
        assert!(html.contains(r#"src="/blog/static/avatar.png""#));
    }

    #[test]
    fn test_policy_offers_consent_revoke() {
        let fm = FrontMatter {
            title: Some("Privacy Policy".to_string()),
            ..Default::default()
        };
        let html = policy(&config(), "<p>We store one cookie.</p>", &fm);
        assert!(html.contains(r#"action="/consent/revoke""#));
        assert!(html.contains("Revoke analytics consent"));
    }

    #[test]
    fn test_shell_embeds_consent_prompt_and_scripts() {
        let html = page_shell(&config(), "Home", "<p>body</p>");
        assert!(html.contains("cookie-consent"));
        assert!(html.contains("newsletter-form"));
        assert!(html.contains("copy-button") || html.contains(".code-block"));
    }
}
