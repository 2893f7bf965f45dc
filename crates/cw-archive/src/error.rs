//! Archive error types.

/// Error producing an archive.
///
/// Fatal for the archive being built only; other outputs of the module are
/// unaffected.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// I/O error while writing entries.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML writer error.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Zip packaging error.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
