//! Provider table: hostname → embed player.

use std::fmt::Write;
use std::sync::LazyLock;

use cw_model::Provider;
use cw_renderer::escape_html;
use regex::Regex;
use url::Url;

use crate::consts::{EMBED_HEIGHT, EMBED_WIDTH};

static IFRAME_SRC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<iframe\b[^>]*?\ssrc\s*=\s*"([^"]*)""#).expect("invalid iframe regex")
});

/// A source URL matched against the provider table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Playback {
    pub provider: Provider,
    /// Provider-side video identifier, when the URL carries one.
    pub video_id: Option<String>,
    /// Embeddable player URL.
    pub src: Option<String>,
}

/// Match a source URL against the provider table.
///
/// Unknown hosts and unparsable URLs yield [`Provider::Unsupported`] holding
/// the host (or the raw URL when there is no host).
pub fn identify(url: &str) -> Playback {
    let Ok(parsed) = Url::parse(url.trim()) else {
        return unsupported(url.trim());
    };
    let Some(host) = parsed.host_str().map(str::to_ascii_lowercase) else {
        return unsupported(url.trim());
    };
    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    match host.as_str() {
        "vimeo.com" | "www.vimeo.com" | "player.vimeo.com" => {
            let id = segments.last().map(|s| (*s).to_owned());
            Playback {
                src: id
                    .as_ref()
                    .map(|id| format!("https://player.vimeo.com/video/{id}")),
                video_id: id,
                provider: Provider::Vimeo,
            }
        }
        "www.canal-u.tv" | "canal-u.tv" => {
            let trimmed = url.trim().trim_end_matches('/');
            let src = trimmed
                .rsplit_once('/')
                .filter(|(_, last)| !last.is_empty() && !segments.is_empty())
                .map(|(parent, last)| {
                    format!("{parent}/embed.1/{last}?width=100%&height=100%&")
                });
            Playback {
                provider: Provider::CanalU,
                video_id: segments.last().map(|s| (*s).to_owned()),
                src,
            }
        }
        "www.youtube.com" | "youtube.com" | "m.youtube.com" | "youtu.be" => {
            let id = youtube_id(&host, &parsed, &segments);
            Playback {
                src: id
                    .as_ref()
                    .map(|id| format!("https://www.youtube.com/embed/{id}")),
                video_id: id,
                provider: Provider::YouTube,
            }
        }
        _ => unsupported(&host),
    }
}

fn unsupported(host: &str) -> Playback {
    Playback {
        provider: Provider::Unsupported(host.to_owned()),
        video_id: None,
        src: None,
    }
}

fn youtube_id(host: &str, url: &Url, segments: &[&str]) -> Option<String> {
    if host == "youtu.be" {
        return segments.first().map(|s| (*s).to_owned());
    }
    match segments {
        ["watch"] => url
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned()),
        ["embed" | "shorts" | "live", id, ..] => Some((*id).to_owned()),
        _ => None,
    }
}

/// Embed markup for a playback: an iframe, or the unsupported placeholder.
pub fn embed_html(playback: &Playback) -> String {
    match &playback.src {
        Some(src) => {
            let mut out = String::new();
            write!(
                out,
                r#"<iframe src="{}" width="{EMBED_WIDTH}" height="{EMBED_HEIGHT}" frameborder="0" allowfullscreen></iframe>"#,
                escape_html(src)
            )
            .unwrap();
            out
        }
        None => {
            let name = match &playback.provider {
                Provider::Unsupported(host) => host.clone(),
                other => other.to_string(),
            };
            format!("<p>Unsupported video provider ({})</p>", escape_html(&name))
        }
    }
}

/// Find the iframe `src` in an embed fragment (the raw playback URL).
pub fn embed_src(fragment: &str) -> Option<String> {
    let caps = IFRAME_SRC_PATTERN.captures(fragment)?;
    let src = caps[1]
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");
    (!src.is_empty()).then_some(src)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_vimeo() {
        let playback = identify("https://vimeo.com/12345/");
        assert_eq!(playback.provider, Provider::Vimeo);
        assert_eq!(playback.video_id.as_deref(), Some("12345"));
        assert_eq!(
            playback.src.as_deref(),
            Some("https://player.vimeo.com/video/12345")
        );
    }

    #[test]
    fn test_canal_u() {
        let playback =
            identify("https://www.canal-u.tv/video/universite_de_tous_les_savoirs/pourquoi_il_fait_nuit.1207");
        assert_eq!(playback.provider, Provider::CanalU);
        assert_eq!(
            playback.src.as_deref(),
            Some(
                "https://www.canal-u.tv/video/universite_de_tous_les_savoirs/embed.1/pourquoi_il_fait_nuit.1207?width=100%&height=100%&"
            )
        );
    }

    #[test]
    fn test_youtube_forms() {
        for url in [
            "https://www.youtube.com/watch?v=abc123&t=5",
            "https://youtu.be/abc123",
            "https://youtube.com/embed/abc123",
        ] {
            let playback = identify(url);
            assert_eq!(playback.provider, Provider::YouTube, "{url}");
            assert_eq!(playback.video_id.as_deref(), Some("abc123"), "{url}");
            assert_eq!(
                playback.src.as_deref(),
                Some("https://www.youtube.com/embed/abc123")
            );
        }
    }

    #[test]
    fn test_unknown_host() {
        let playback = identify("https://unknown.example/v/1");
        assert_eq!(
            playback.provider,
            Provider::Unsupported("unknown.example".to_owned())
        );
        assert_eq!(
            embed_html(&playback),
            "<p>Unsupported video provider (unknown.example)</p>"
        );
    }

    #[test]
    fn test_unparsable_url() {
        let playback = identify("not a url");
        assert_eq!(playback.provider, Provider::Unsupported("not a url".to_owned()));
        assert!(playback.src.is_none());
    }

    #[test]
    fn test_embed_html_iframe() {
        let playback = identify("https://vimeo.com/42");
        assert_eq!(
            embed_html(&playback),
            r#"<iframe src="https://player.vimeo.com/video/42" width="500" height="281" frameborder="0" allowfullscreen></iframe>"#
        );
    }

    #[test]
    fn test_embed_src_round_trips_escaped_query() {
        let playback = identify("https://www.canal-u.tv/video/chan/name.1");
        let embed = embed_html(&playback);
        assert!(embed.contains("&amp;height"));
        assert_eq!(embed_src(&embed), playback.src);
    }

    #[test]
    fn test_embed_src_absent() {
        assert_eq!(embed_src("<p>Unsupported video provider (x)</p>"), None);
        assert_eq!(
            embed_src(r#"<IFRAME width="1" src="https://a.b/c"></IFRAME>"#).as_deref(),
            Some("https://a.b/c")
        );
    }
}
