//! Video line resolution.

use cw_model::{Provider, VideoReference, Warning};

use crate::consts::DEFAULT_THUMBNAIL_URL;
use crate::provider::{Playback, embed_html, embed_src, identify};
use crate::thumbnail::ThumbnailFetcher;

/// Resolves video lines into [`VideoReference`]s.
///
/// Resolution never fails: unsupported providers get a placeholder embed and
/// failed thumbnail lookups fall back to the default thumbnail, each with a
/// recorded warning.
pub struct VideoResolver {
    fetcher: Option<Box<dyn ThumbnailFetcher>>,
    default_thumbnail: String,
}

impl VideoResolver {
    /// Resolver that never touches the network; Vimeo videos get the
    /// default thumbnail silently.
    #[must_use]
    pub fn offline() -> Self {
        Self {
            fetcher: None,
            default_thumbnail: DEFAULT_THUMBNAIL_URL.to_owned(),
        }
    }

    /// Resolver that looks Vimeo thumbnails up with `fetcher`.
    #[must_use]
    pub fn new(fetcher: impl ThumbnailFetcher + 'static) -> Self {
        Self {
            fetcher: Some(Box::new(fetcher)),
            default_thumbnail: DEFAULT_THUMBNAIL_URL.to_owned(),
        }
    }

    #[must_use]
    pub fn with_default_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.default_thumbnail = url.into();
        self
    }

    /// Resolve a video line. Warnings carry no location; the caller adds it.
    pub fn resolve(&self, url: &str, title: &str) -> (VideoReference, Vec<Warning>) {
        let mut warnings = Vec::new();
        let playback = identify(url);

        match (&playback.provider, &playback.src) {
            (Provider::Unsupported(host), _) => {
                warnings.push(Warning::content(format!(
                    "unsupported video provider ({host}) for {url}"
                )));
            }
            (provider, None) => {
                warnings.push(Warning::content(format!(
                    "no {provider} video id in {url}"
                )));
            }
            _ => {}
        }

        let thumbnail = self.thumbnail(&playback, &mut warnings);
        let embed = embed_html(&playback);
        let reference = VideoReference {
            url: url.to_owned(),
            title: title.to_owned(),
            src: embed_src(&embed),
            embed,
            provider: playback.provider,
            thumbnail,
        };
        (reference, warnings)
    }

    fn thumbnail(&self, playback: &Playback, warnings: &mut Vec<Warning>) -> String {
        let Some(id) = &playback.video_id else {
            return self.default_thumbnail.clone();
        };
        match (&playback.provider, &self.fetcher) {
            (Provider::YouTube, _) => format!("https://img.youtube.com/vi/{id}/hqdefault.jpg"),
            (Provider::Vimeo, Some(fetcher)) => match fetcher.fetch(id) {
                Ok(link) => link,
                Err(e) => {
                    tracing::warn!(video = %id, error = %e, "Thumbnail lookup failed");
                    warnings.push(Warning::resource(format!(
                        "thumbnail lookup failed for vimeo video {id}: {e}"
                    )));
                    self.default_thumbnail.clone()
                }
            },
            _ => self.default_thumbnail.clone(),
        }
    }
}

impl Default for VideoResolver {
    fn default() -> Self {
        Self::offline()
    }
}
