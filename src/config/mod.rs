//! Configuration module

mod site;

pub use site::AnalyticsConfig;
pub use site::ConsentConfig;
pub use site::FeedConfig;
pub use site::NewsletterConfig;
pub use site::SiteConfig;
