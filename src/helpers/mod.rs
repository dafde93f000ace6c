//! Helper functions shared by layouts and generators
//!
//! URL resolution, HTML escaping and date formatting used across the
//! layout renderers and the feed writer.

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
