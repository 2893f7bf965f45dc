//! Static files copied verbatim into every EDX archive.

use std::collections::BTreeMap;

const DEFAULT_FILES: &[(&str, &str)] = &[
    (
        "about/overview.html",
        include_str!("../defaults/edx/about/overview.html"),
    ),
    (
        "info/updates.html",
        include_str!("../defaults/edx/info/updates.html"),
    ),
    (
        "assets/assets.xml",
        include_str!("../defaults/edx/assets/assets.xml"),
    ),
    (
        "policies/assets.json",
        include_str!("../defaults/edx/policies/assets.json"),
    ),
];

/// Boilerplate files keyed by their path inside the archive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Boilerplate {
    files: BTreeMap<String, Vec<u8>>,
}

impl Boilerplate {
    /// No boilerplate at all.
    pub fn empty() -> Self {
        Self {
            files: BTreeMap::new(),
        }
    }

    /// Add or replace a file.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.files.insert(path.into(), bytes.into());
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.files
            .iter()
            .map(|(path, bytes)| (path.as_str(), bytes.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl Default for Boilerplate {
    /// Built-in course overview, updates page and empty asset policies.
    fn default() -> Self {
        DEFAULT_FILES
            .iter()
            .fold(Self::empty(), |acc, (path, content)| {
                acc.with_file(*path, content.as_bytes())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_files() {
        let boilerplate = Boilerplate::default();
        assert_eq!(boilerplate.len(), 4);
        let paths: Vec<_> = boilerplate.iter().map(|(path, _)| path).collect();
        assert!(paths.contains(&"policies/assets.json"));
    }

    #[test]
    fn test_override() {
        let boilerplate =
            Boilerplate::default().with_file("info/updates.html", "<ol><li>x</li></ol>");
        let (_, bytes) = boilerplate
            .iter()
            .find(|(path, _)| *path == "info/updates.html")
            .unwrap();
        assert_eq!(bytes, b"<ol><li>x</li></ol>");
    }
}
