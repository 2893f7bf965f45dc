//! CLI error types.

use cw_config::ConfigError;
use cw_site::SiteError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Site(#[from] SiteError),

    #[error("{0}")]
    Validation(String),

    /// The site was written without the modules that failed.
    #[error("{0} module(s) failed to compile")]
    ModulesFailed(usize),
}
