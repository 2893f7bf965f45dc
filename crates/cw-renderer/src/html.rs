//! HTML and XHTML backends.

use std::fmt::Write;

use crate::backend::RenderBackend;
use crate::state::escape_html;

/// HTML5 render backend.
pub struct HtmlBackend;

impl RenderBackend for HtmlBackend {
    fn code_block(lang: Option<&str>, content: &str, out: &mut String) {
        write_code_block(lang, content, out);
    }

    fn image(src: &str, alt: &str, title: &str, out: &mut String) {
        write_img_open(src, alt, title, out);
        out.push('>');
    }
}

/// XHTML render backend.
///
/// Output is well-formed XML: void elements are self-closed and raw HTML
/// from the source is escaped as text, since it cannot be trusted to nest.
pub struct XhtmlBackend;

impl RenderBackend for XhtmlBackend {
    fn code_block(lang: Option<&str>, content: &str, out: &mut String) {
        write_code_block(lang, content, out);
    }

    fn image(src: &str, alt: &str, title: &str, out: &mut String) {
        write_img_open(src, alt, title, out);
        out.push_str(" />");
    }

    fn raw_html(html: &str, out: &mut String) {
        out.push_str(&escape_html(html));
    }

    fn hard_break(out: &mut String) {
        out.push_str("<br />");
    }

    fn horizontal_rule(out: &mut String) {
        out.push_str("<hr />");
    }

    fn task_list_marker(checked: bool, out: &mut String) {
        if checked {
            out.push_str(r#"<input type="checkbox" checked="checked" disabled="disabled" /> "#);
        } else {
            out.push_str(r#"<input type="checkbox" disabled="disabled" /> "#);
        }
    }
}

fn write_code_block(lang: Option<&str>, content: &str, out: &mut String) {
    if let Some(lang) = lang {
        write!(
            out,
            r#"<pre><code class="language-{}">{}</code></pre>"#,
            escape_html(lang),
            escape_html(content)
        )
        .unwrap();
    } else {
        write!(out, "<pre><code>{}</code></pre>", escape_html(content)).unwrap();
    }
}

fn write_img_open(src: &str, alt: &str, title: &str, out: &mut String) {
    let title_attr = if title.is_empty() {
        String::new()
    } else {
        format!(r#" title="{}""#, escape_html(title))
    };
    write!(
        out,
        r#"<img src="{}"{title_attr} alt="{}""#,
        escape_html(src),
        escape_html(alt)
    )
    .unwrap();
}
