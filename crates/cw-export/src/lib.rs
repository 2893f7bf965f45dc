//! Text exporters for compiled course modules.
//!
//! - [`render_module`] / [`render_subsection`]: HTML fragment, with quiz
//!   feedback gated by [`HtmlOptions::feedback`]
//! - [`to_gift`]: GIFT-style quiz bank
//! - [`to_video_list`]: one playback URL per line
//!
//! All exporters are pure: they read the module and return a string.

mod gift;
mod html;
mod videos;

pub use gift::to_gift;
pub use html::{HtmlOptions, render_module, render_subsection};
pub use videos::to_video_list;
