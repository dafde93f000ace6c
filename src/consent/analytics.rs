//! Analytics embeds mounted once consent is granted
//!
//! Each configured provider contributes one script fragment. Plausible
//! and Simple Analytics only load in the production environment; Google
//! Analytics loads whenever a measurement id is configured. Unconfigured
//! providers contribute nothing, so the whole block can be empty.

use crate::config::SiteConfig;

/// The combined analytics fragment for this configuration
///
/// Provider order is fixed so regenerated pages stay byte-stable.
pub fn scripts(config: &SiteConfig) -> String {
    let mut out = String::new();

    if config.is_production() {
        if !config.analytics.plausible_data_domain.is_empty() {
            out.push_str(&plausible(&config.analytics.plausible_data_domain));
        }
        if config.analytics.simple_analytics {
            out.push_str(SIMPLE_ANALYTICS);
        }
    }

    if !config.analytics.google_analytics_id.is_empty() {
        out.push_str(&google_analytics(&config.analytics.google_analytics_id));
    }

    out
}

fn plausible(domain: &str) -> String {
    format!(
        "<script async defer data-domain=\"{}\" src=\"https://plausible.io/js/plausible.js\"></script>\n",
        domain
    )
}

const SIMPLE_ANALYTICS: &str =
    "<script async defer src=\"https://scripts.simpleanalyticscdn.com/latest.js\"></script>\n";

fn google_analytics(id: &str) -> String {
    format!(
        r#"<script async src="https://www.googletagmanager.com/gtag/js?id={id}"></script>
<script>
window.dataLayer = window.dataLayer || [];
function gtag() {{ dataLayer.push(arguments); }}
gtag('js', new Date());
gtag('config', '{id}');
</script>
"#,
        id = id
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(environment: &str) -> SiteConfig {
        SiteConfig {
            environment: environment.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_providers_yields_empty_block() {
        assert_eq!(scripts(&config("production")), "");
    }

    #[test]
    fn test_plausible_and_simple_are_production_only() {
        let mut cfg = config("development");
        cfg.analytics.plausible_data_domain = "example.com".to_string();
        cfg.analytics.simple_analytics = true;
        assert_eq!(scripts(&cfg), "");

        cfg.environment = "production".to_string();
        let block = scripts(&cfg);
        assert!(block.contains(r#"data-domain="example.com""#));
        assert!(block.contains("simpleanalyticscdn.com"));
    }

    #[test]
    fn test_google_analytics_loads_on_id_alone() {
        let mut cfg = config("development");
        cfg.analytics.google_analytics_id = "G-ABC123".to_string();
        let block = scripts(&cfg);
        assert!(block.contains("gtag/js?id=G-ABC123"));
        assert!(block.contains("gtag('config', 'G-ABC123')"));
    }

    #[test]
    fn test_provider_order_is_stable() {
        let mut cfg = config("production");
        cfg.analytics.plausible_data_domain = "example.com".to_string();
        cfg.analytics.simple_analytics = true;
        cfg.analytics.google_analytics_id = "G-ABC123".to_string();

        let block = scripts(&cfg);
        let plausible = block.find("plausible.io").unwrap();
        let simple = block.find("simpleanalyticscdn").unwrap();
        let ga = block.find("googletagmanager").unwrap();
        assert!(plausible < simple && simple < ga);
    }
}
