//! Site assembly errors.

use std::path::PathBuf;

/// Error returned while loading a repository or writing a site.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
    #[error("Invalid path pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("{} is not valid UTF-8", .0.display())]
    NotUtf8(PathBuf),
    #[error("Repository not found: {}", .0.display())]
    RepositoryNotFound(PathBuf),
    /// Building into the repository itself would delete the sources.
    #[error("Destination {} is the repository root", .0.display())]
    DestinationIsRepository(PathBuf),
}
