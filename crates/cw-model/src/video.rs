//! Resolved video references.

use std::fmt;

/// Video hosting provider recognized from the URL host.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Provider {
    Vimeo,
    CanalU,
    YouTube,
    /// Host not in the provider table (or URL without a host).
    Unsupported(String),
}

impl Provider {
    #[must_use]
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vimeo => f.write_str("vimeo"),
            Self::CanalU => f.write_str("canal-u"),
            Self::YouTube => f.write_str("youtube"),
            Self::Unsupported(host) => write!(f, "unsupported ({host})"),
        }
    }
}

/// A video line resolved against the provider table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VideoReference {
    /// Source URL as written by the author.
    pub url: String,
    pub title: String,
    pub provider: Provider,
    /// Embed markup (an iframe, or a placeholder paragraph).
    pub embed: String,
    /// Playback URL read back from the iframe in `embed`; `None` for a
    /// placeholder.
    pub src: Option<String>,
    pub thumbnail: String,
}

impl VideoReference {
    /// URL used in video manifests: the playback source, else the source URL.
    #[must_use]
    pub fn playback_url(&self) -> &str {
        self.src.as_deref().unwrap_or(&self.url)
    }
}
