//! Media blobs supplied alongside module text.

use std::collections::BTreeMap;

/// Media files keyed by their path relative to the module's `media/` folder.
///
/// Keys are normalized on insert so `./media/a.png`, `media/a.png` and
/// `a.png` all name the same entry. Iteration is sorted by name, which keeps
/// archive output reproducible.
///
/// Names that would escape the media folder (`..` segments, absolute paths,
/// drive prefixes) are never stored. They are kept in [`MediaSet::rejected`]
/// so callers can report them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MediaSet {
    files: BTreeMap<String, Vec<u8>>,
    rejected: Vec<String>,
}

impl MediaSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a file, replacing any previous entry with the same name.
    ///
    /// Returns `false` when the name is unsafe and the file was rejected.
    pub fn insert(&mut self, name: &str, bytes: Vec<u8>) -> bool {
        match normalize(name) {
            Some(key) if key.is_empty() => true,
            Some(key) => {
                self.files.insert(key, bytes);
                true
            }
            None => {
                self.rejected.push(name.to_owned());
                false
            }
        }
    }

    #[must_use]
    pub fn with_file(mut self, name: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(name, bytes.into());
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.files.get(&normalize(name)?).map(Vec::as_slice)
    }

    /// Names refused by [`MediaSet::insert`], in insertion order.
    #[must_use]
    pub fn rejected(&self) -> &[String] {
        &self.rejected
    }

    /// Iterate over `(name, bytes)` in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.files.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// First file whose stem is `logo` (`logo.png`, `logo.svg`, ...).
    #[must_use]
    pub fn logo(&self) -> Option<&str> {
        self.files
            .keys()
            .map(String::as_str)
            .find(|name| {
                !name.contains('/') && name.split_once('.').is_some_and(|(stem, _)| stem == "logo")
            })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Key for `name` relative to the media folder, `None` when it would leave it.
fn normalize(name: &str) -> Option<String> {
    let name = name.replace('\\', "/");
    if name.starts_with('/') {
        return None;
    }
    let mut name = name.trim_start_matches("./");
    name = name.strip_prefix("media/").unwrap_or(name);

    let mut segments = Vec::new();
    for (index, segment) in name.split('/').enumerate() {
        match segment {
            "" | "." => {}
            ".." => return None,
            // `C:` and friends
            s if index == 0 && s.ends_with(':') => return None,
            s => segments.push(s),
        }
    }
    Some(segments.join("/"))
}
