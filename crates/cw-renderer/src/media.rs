use std::borrow::Cow;

/// Rewrite a reference to the module's `media/` folder against `base`.
///
/// `media/img.png` and `./media/img.png` become `{base}img.png`; `base` is
/// expected to end with a slash. Any other URL is returned unchanged.
///
/// # Examples
///
/// ```
/// use cw_renderer::rewrite_media_url;
///
/// assert_eq!(rewrite_media_url("media/a.png", "/static/"), "/static/a.png");
/// assert_eq!(rewrite_media_url("https://x.org/a.png", "/static/"), "https://x.org/a.png");
/// ```
#[must_use]
pub fn rewrite_media_url<'a>(url: &'a str, base: &str) -> Cow<'a, str> {
    let relative = url.strip_prefix("./").unwrap_or(url);
    match relative.strip_prefix("media/") {
        Some(rest) => Cow::Owned(format!("{base}{rest}")),
        None => Cow::Borrowed(url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_media_url() {
        assert_eq!(
            rewrite_media_url("./media/img/a.png", "http://h/m1/media/"),
            "http://h/m1/media/img/a.png"
        );
        assert_eq!(rewrite_media_url("other/a.png", "/static/"), "other/a.png");
        assert_eq!(rewrite_media_url("#media/x", "/static/"), "#media/x");
    }
}
