//! Error types for the backup pipeline.
//!
//! Only *fatal* conditions surface as [`Error`] from
//! [`BackupOrchestrator::run`](crate::BackupOrchestrator::run): a missing
//! installation root, a directory that does not look like an installation, or
//! an output directory that cannot be created. Failures inside individual
//! copy/catalog steps are recorded in the result's error log instead.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while backing up an installation.
#[derive(Error, Debug)]
pub enum Error {
    /// Filesystem I/O failed (reading sources, writing the bundle, etc.).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A directory walk failed partway through.
    #[error("Traversal error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Writing the zip archive failed.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The installation root does not exist.
    #[error("Minecraft path does not exist: {0}")]
    RootNotFound(Utf8PathBuf),

    /// The root exists but none of the marker files/directories were found.
    #[error("Not a Minecraft installation: {root} ({reason})")]
    NotAnInstallation { root: Utf8PathBuf, reason: String },

    /// The timestamped output directory could not be created.
    #[error("Failed to create backup folder {path}: {source}")]
    OutputDir {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A path under the installation is not valid UTF-8.
    #[error("Non UTF-8 path: {0}")]
    NonUtf8Path(std::path::PathBuf),
}
