//! Helper functions for rendering
//!
//! Date display, reading time, URLs for blog routes and the HTML
//! renderers used by the server.

mod date;
pub mod html;
mod url;

pub use date::*;
pub use url::*;
