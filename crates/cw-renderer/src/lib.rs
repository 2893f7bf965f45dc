//! Markdown renderer with pluggable backends.
//!
//! Renders the prose blocks of a course module. The generic
//! [`MarkdownRenderer`] handles shared elements (lists, tables, inline
//! formatting) and delegates markup that differs between targets to a
//! [`RenderBackend`]:
//! - [`HtmlBackend`]: HTML5 for web pages and archive content files
//! - [`XhtmlBackend`]: well-formed XHTML for embedding in XML documents
//!
//! References to the module's `media/` folder can be rewritten against a
//! base URL with [`MarkdownRenderer::with_media_base`].
//!
//! # Example
//!
//! ```
//! use cw_renderer::{HtmlBackend, MarkdownRenderer};
//!
//! let html = MarkdownRenderer::<HtmlBackend>::new()
//!     .with_media_base("https://example.org/module1/media/")
//!     .render_markdown("![chart](media/chart.png)");
//! assert_eq!(
//!     html,
//!     r#"<p><img src="https://example.org/module1/media/chart.png" alt="chart"></p>"#
//! );
//! ```

mod backend;
mod html;
mod media;
mod renderer;
mod state;

pub use backend::RenderBackend;
pub use html::{HtmlBackend, XhtmlBackend};
pub use media::rewrite_media_url;
pub use renderer::MarkdownRenderer;
pub use state::escape_html;
