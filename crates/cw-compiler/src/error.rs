use cw_parser::StructureError;

/// Fatal error compiling a module.
///
/// Everything else (bad quiz blocks, unknown video hosts, failed thumbnail
/// lookups, archive failures) is recorded as a warning instead.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("module {module}: {source}")]
    Structure {
        module: String,
        #[source]
        source: StructureError,
    },
}

impl CompileError {
    /// Name of the module that failed.
    #[must_use]
    pub fn module(&self) -> &str {
        match self {
            Self::Structure { module, .. } => module,
        }
    }
}
