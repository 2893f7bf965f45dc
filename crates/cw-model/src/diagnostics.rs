//! Non-fatal diagnostics collected during a compile.

use std::fmt;

/// What kind of problem a warning reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum WarningKind {
    /// Problem in the authored content (malformed question, unknown provider).
    Content,
    /// Problem reaching an external resource (thumbnail lookup, archive packaging).
    Resource,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Content => f.write_str("content"),
            Self::Resource => f.write_str("resource"),
        }
    }
}

/// A recorded warning, returned alongside successful output.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Warning {
    pub kind: WarningKind,
    /// Where the problem was found (`"module1 line 12"`, `"module1 section 1.2"`).
    pub location: Option<String>,
    pub message: String,
}

impl Warning {
    pub fn content(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::Content,
            location: None,
            message: message.into(),
        }
    }

    pub fn resource(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::Resource,
            location: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "[{}] {location}: {}", self.kind, self.message),
            None => write!(f, "[{}] {}", self.kind, self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let warning = Warning::content("no correct answer").at("module1 line 4");
        assert_eq!(warning.to_string(), "[content] module1 line 4: no correct answer");
        let warning = Warning::resource("timeout");
        assert_eq!(warning.to_string(), "[resource] timeout");
    }
}
