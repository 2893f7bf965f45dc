//! Archive containers.

use std::io::{Cursor, Write};

use flate2::Compression;
use flate2::write::GzEncoder;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::error::ArchiveError;

/// Container receiving archive entries by relative path.
///
/// Entry timestamps are fixed so identical input yields identical bytes.
pub trait Package {
    fn add_file(&mut self, path: &str, bytes: &[u8]) -> Result<(), ArchiveError>;

    /// Close the container and return its bytes.
    fn finish(self) -> Result<Vec<u8>, ArchiveError>;
}

/// Deflate-compressed zip archive.
pub struct ZipPackage {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
}

impl ZipPackage {
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .last_modified_time(DateTime::default()),
        }
    }
}

impl Default for ZipPackage {
    fn default() -> Self {
        Self::new()
    }
}

impl Package for ZipPackage {
    fn add_file(&mut self, path: &str, bytes: &[u8]) -> Result<(), ArchiveError> {
        self.writer.start_file(path, self.options)?;
        self.writer.write_all(bytes)?;
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>, ArchiveError> {
        Ok(self.writer.finish()?.into_inner())
    }
}

/// Gzip-compressed tar archive with every entry under a root directory.
pub struct TarGzPackage {
    builder: tar::Builder<GzEncoder<Vec<u8>>>,
    root: String,
}

impl TarGzPackage {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            builder: tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default())),
            root: root.into(),
        }
    }
}

impl Package for TarGzPackage {
    fn add_file(&mut self, path: &str, bytes: &[u8]) -> Result<(), ArchiveError> {
        let mut header = tar::Header::new_gnu();
        header.set_size(bytes.len() as u64);
        header.set_mode(0o644);
        header.set_mtime(0);
        self.builder
            .append_data(&mut header, format!("{}/{path}", self.root), bytes)?;
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>, ArchiveError> {
        let encoder = self.builder.into_inner()?;
        Ok(encoder.finish()?)
    }
}
