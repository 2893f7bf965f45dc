//! Video provider resolution for course modules.
//!
//! Video lines (`[title](url){: .cnvideo}`) are matched against a static
//! provider table (Vimeo, Canal-U, YouTube) to build an embed player and a
//! thumbnail. Thumbnail lookups go through the [`ThumbnailFetcher`] trait;
//! [`VimeoThumbnails`] queries the Vimeo API over HTTP.
//!
//! # Example
//!
//! ```
//! use cw_video::VideoResolver;
//!
//! let resolver = VideoResolver::offline();
//! let (video, warnings) = resolver.resolve("https://vimeo.com/12345", "Intro");
//! assert_eq!(video.src.as_deref(), Some("https://player.vimeo.com/video/12345"));
//! assert!(warnings.is_empty());
//! ```

mod consts;
mod provider;
mod resolver;
mod thumbnail;

pub use consts::{DEFAULT_THUMBNAIL_URL, DEFAULT_TIMEOUT, VIMEO_THUMBNAIL_API_URL};
pub use provider::{Playback, embed_html, embed_src, identify};
pub use resolver::VideoResolver;
pub use thumbnail::{ThumbnailError, ThumbnailFetcher, VimeoThumbnails};
