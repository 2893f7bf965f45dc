//! Environment references in configuration strings.

use crate::ConfigError;

/// Expands `${VAR}` and `${VAR:-default}` across a set of config fields.
///
/// Only braced references are touched, so URLs holding a bare `$` survive.
/// Every unset variable of every field is collected and reported together
/// by [`EnvExpansion::finish`].
#[derive(Debug, Default)]
pub(crate) struct EnvExpansion {
    failed_fields: Vec<&'static str>,
    unset: Vec<String>,
}

impl EnvExpansion {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Expand `value` in place. A field with unset variables keeps its raw text.
    pub(crate) fn field(&mut self, field: &'static str, value: &mut String) {
        match expand_references(value) {
            Ok(Some(expanded)) => *value = expanded,
            Ok(None) => {}
            Err(unset) => {
                self.failed_fields.push(field);
                for var in unset {
                    if !self.unset.contains(&var) {
                        self.unset.push(var);
                    }
                }
            }
        }
    }

    pub(crate) fn finish(self) -> Result<(), ConfigError> {
        if self.failed_fields.is_empty() {
            return Ok(());
        }
        let vars: Vec<String> = self.unset.iter().map(|var| format!("${{{var}}}")).collect();
        Err(ConfigError::EnvVar {
            field: self.failed_fields.join(", "),
            message: format!("{} not set", vars.join(", ")),
        })
    }
}

/// Expanded text, `None` when `value` holds no reference, or the names of
/// the unset variables.
fn expand_references(value: &str) -> Result<Option<String>, Vec<String>> {
    if !value.contains("${") {
        return Ok(None);
    }

    let mut out = String::with_capacity(value.len());
    let mut unset = Vec::new();
    let mut rest = value;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let reference = &rest[start..=start + len];
        let name = &reference[2..reference.len() - 1];
        if !name.contains(":-") && std::env::var(name).is_err() {
            unset.push(name.to_owned());
        } else {
            let expanded =
                shellexpand::env_with_context_no_errors(reference, |var| std::env::var(var).ok());
            out.push_str(&expanded);
        }
        rest = &rest[start + len + 1..];
    }
    out.push_str(rest);

    if unset.is_empty() {
        Ok(Some(out))
    } else {
        Err(unset)
    }
}
