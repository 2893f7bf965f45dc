//! Position tags and the identifiers derived from them.
//!
//! Sections are tagged `"1"`, `"2"`, …, subsections `"1.1"`, `"1.2"`, ….
//! The implicit leading section is `"0"` and an implicit leading subsection
//! is `"N.0"`. Anchors, quiz-bank categories and archive identifiers are all
//! computed here so every exporter agrees on them.

/// Tag of the `index`-th section (1-based; 0 is the implicit section).
#[must_use]
pub fn section_num(index: usize) -> String {
    index.to_string()
}

/// Tag of the `index`-th subsection of `section`.
#[must_use]
pub fn subsection_num(section: &str, index: usize) -> String {
    format!("{section}.{index}")
}

/// HTML anchor and archive identifier (`"1.2"` → `"sec_1_2"`).
#[must_use]
pub fn anchor(num: &str) -> String {
    format!("sec_{}", num.replace('.', "_"))
}

/// Identifier of the `index`-th item of a kind inside a subsection
/// (`item_id("1.2", "q", 3)` → `"sec_1_2_q3"`). Indexes are 1-based.
#[must_use]
pub fn item_id(num: &str, kind: &str, index: usize) -> String {
    format!("{}_{kind}{index}", anchor(num))
}

/// Quiz-bank category of a subsection (`"module1 section 1.2"`).
#[must_use]
pub fn category(module: &str, num: &str) -> String {
    format!("{module} section {num}")
}

/// Numbered heading text. Sections get a trailing dot (`"1. Intro"`),
/// subsections do not (`"1.2 Details"`).
#[must_use]
pub fn heading(num: &str, title: &str) -> String {
    if num.contains('.') {
        format!("{num} {title}")
    } else {
        format!("{num}. {title}")
    }
}

/// Convert text to a URL-safe slug.
///
/// Latin accented letters are folded to their ASCII base letter; any other
/// non-alphanumeric character is dropped or collapsed into a dash.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut result = String::new();
    let mut last_was_dash = true;

    for c in text.trim().chars() {
        let c = fold_accent(c);
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_') {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}

fn fold_accent(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'ç' => 'c',
        'Ç' => 'C',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'È' | 'É' | 'Ê' | 'Ë' => 'E',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'Ì' | 'Í' | 'Î' | 'Ï' => 'I',
        'ñ' => 'n',
        'Ñ' => 'N',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'Ù' | 'Ú' | 'Û' | 'Ü' => 'U',
        'ý' | 'ÿ' => 'y',
        'Ý' => 'Y',
        _ => c,
    }
}
