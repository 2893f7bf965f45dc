//! Render backend trait for target-specific markup.

/// Backend trait for target-specific rendering operations.
///
/// Implementations differ in how void elements are closed and whether raw
/// HTML from the source may pass through unchanged.
pub trait RenderBackend {
    /// Render a code block.
    fn code_block(lang: Option<&str>, content: &str, out: &mut String);

    /// Render an image.
    fn image(src: &str, alt: &str, title: &str, out: &mut String);

    /// Render raw HTML found in the markdown source.
    ///
    /// Default passes it through unchanged.
    fn raw_html(html: &str, out: &mut String) {
        out.push_str(html);
    }

    /// Render blockquote start tag.
    fn blockquote_start(out: &mut String) {
        out.push_str("<blockquote>");
    }

    /// Render blockquote end tag.
    fn blockquote_end(out: &mut String) {
        out.push_str("</blockquote>");
    }

    /// Render a hard break.
    fn hard_break(out: &mut String) {
        out.push_str("<br>");
    }

    /// Render a horizontal rule.
    fn horizontal_rule(out: &mut String) {
        out.push_str("<hr>");
    }

    /// Render a task list marker.
    fn task_list_marker(checked: bool, out: &mut String) {
        if checked {
            out.push_str(r#"<input type="checkbox" checked disabled> "#);
        } else {
            out.push_str(r#"<input type="checkbox" disabled> "#);
        }
    }
}
