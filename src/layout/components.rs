//! Shared embed components
//!
//! The small pieces every layout composes: images, links, tag chips, the
//! code-copy affordance and the newsletter signup form. Each returns an
//! HTML fragment.

use crate::config::SiteConfig;
use crate::helpers::{html_escape, is_external, url_for};

/// Milliseconds before the copy button reverts to its default label
pub const COPY_RESET_MS: u64 = 2000;

/// User-facing newsletter messages, shared with the client script
pub const NEWSLETTER_SUCCESS: &str = "You are now subscribed \u{1F389}";
pub const NEWSLETTER_ERROR: &str =
    "Your e-mail address is invalid or you are already subscribed!";

/// An image tag
pub fn image(src: &str, alt: &str) -> String {
    format!(
        r#"<img src="{}" alt="{}" loading="lazy">"#,
        src,
        html_escape(alt)
    )
}

/// A hyperlink; external targets open in a new tab
pub fn link(href: &str, text: &str) -> String {
    if is_external(href) {
        format!(
            r#"<a href="{}" target="_blank" rel="noopener">{}</a>"#,
            href, text
        )
    } else {
        format!(r#"<a href="{}">{}</a>"#, href, text)
    }
}

/// A tag chip linking to the tag listing page
pub fn tag_chip(config: &SiteConfig, tag: &str) -> String {
    let slug = slug::slugify(tag);
    let url = url_for(config, &format!("{}/{}/", config.tag_dir, slug));
    format!(
        r#"<a class="tag" href="{}">{}</a>"#,
        url,
        html_escape(tag)
    )
}

/// The newsletter signup form
///
/// Submits `{ email }` to `/api/{provider}`; the client script renders the
/// success or invalid/duplicate message from the response.
pub fn newsletter_form(config: &SiteConfig) -> String {
    format!(
        r#"<form class="newsletter-form" data-provider="{provider}">
  <label>Subscribe to the newsletter
    <input type="email" name="email" placeholder="Enter your email" required>
  </label>
  <button type="submit">Sign up</button>
  <p class="newsletter-message" role="status"></p>
</form>"#,
        provider = config.newsletter.provider
    )
}

/// Site-wide script wiring the copy buttons produced by the markdown
/// renderer: click copies the block's literal text, the label reverts
/// after the reset timeout.
pub fn copy_script() -> String {
    format!(
        r#"<script>
document.querySelectorAll('.code-block').forEach(function (block) {{
  var button = block.querySelector('.copy-button');
  if (!button) return;
  button.addEventListener('click', function () {{
    var code = block.querySelector('pre');
    navigator.clipboard.writeText(code ? code.textContent : '').then(function () {{
      button.textContent = 'Copied';
      setTimeout(function () {{ button.textContent = 'Copy'; }}, {reset});
    }});
  }});
}});
</script>"#,
        reset = COPY_RESET_MS
    )
}

/// Site-wide script driving the newsletter form: one attempt per submit,
/// no retry. A non-error response clears the input.
pub fn newsletter_script() -> String {
    format!(
        r#"<script>
document.querySelectorAll('form.newsletter-form').forEach(function (form) {{
  form.addEventListener('submit', function (event) {{
    event.preventDefault();
    var input = form.querySelector('input[type="email"]');
    var message = form.querySelector('.newsletter-message');
    fetch('/api/' + form.dataset.provider, {{
      method: 'POST',
      headers: {{ 'Content-Type': 'application/json' }},
      body: JSON.stringify({{ email: input.value }}),
    }})
      .then(function (res) {{ return res.json(); }})
      .then(function (data) {{
        if (data.error) {{
          message.textContent = '{error}';
        }} else {{
          input.value = '';
          message.textContent = '{success}';
        }}
      }});
  }});
}});
</script>"#,
        error = NEWSLETTER_ERROR,
        success = NEWSLETTER_SUCCESS
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_external_opens_new_tab() {
        let html = link("https://twitter.com/jane", "@jane");
        assert!(html.contains(r#"target="_blank" rel="noopener""#));

        let html = link("/about/", "About");
        assert!(!html.contains("target"));
    }

    #[test]
    fn test_image_escapes_alt() {
        let html = image("/static/a.png", "a \"b\"");
        assert!(html.contains("alt=\"a &quot;b&quot;\""));
    }

    #[test]
    fn test_tag_chip_links_to_tag_page() {
        let config = SiteConfig::default();
        let html = tag_chip(&config, "Code Quality");
        assert!(html.contains(r#"href="/tags/code-quality/""#));
        assert!(html.contains("Code Quality"));
    }

    #[test]
    fn test_copy_script_reverts_after_2000ms() {
        let script = copy_script();
        assert!(script.contains("navigator.clipboard.writeText"));
        assert!(script.contains("}, 2000)"));
    }

    #[test]
    fn test_newsletter_form_posts_to_provider_api() {
        let config = SiteConfig::default();
        let form = newsletter_form(&config);
        assert!(form.contains(r#"data-provider="buttondown""#));
        assert!(form.contains(r#"type="email""#));

        let script = newsletter_script();
        assert!(script.contains("'/api/' + form.dataset.provider"));
        assert!(script.contains(NEWSLETTER_SUCCESS));
        assert!(script.contains(NEWSLETTER_ERROR));
    }
}
