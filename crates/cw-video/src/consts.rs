//! Video resolution constants.

use std::time::Duration;

/// Default timeout for thumbnail lookups.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Vimeo simple API prefix; `{id}.json` is appended.
pub const VIMEO_THUMBNAIL_API_URL: &str = "https://vimeo.com/api/v2/video/";

/// Thumbnail used when none can be determined.
pub const DEFAULT_THUMBNAIL_URL: &str = "https://i.vimeocdn.com/video/536038298_640.jpg";

/// Fixed iframe box.
pub(crate) const EMBED_WIDTH: u32 = 500;
pub(crate) const EMBED_HEIGHT: u32 = 281;
