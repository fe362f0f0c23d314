//! Configuration error types.

use std::path::{Path, PathBuf};

/// Errors from reading, writing or parsing overlay settings.
///
/// Every file error carries the path involved so a failed layer can be
/// reported precisely and skipped.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A settings file exists but could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The settings directory or file could not be written.
    #[error("cannot write {}: {source}", .path.display())]
    Write {
        /// File or directory that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A settings file is not valid RON for [`Config`](crate::Config).
    #[error("invalid settings in {}: {source}", .path.display())]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Parser error with position.
        #[source]
        source: ron::error::SpannedError,
    },

    /// Settings could not be turned into RON.
    #[error("cannot serialize settings: {0}")]
    Serialize(#[source] ron::Error),
}

impl ConfigError {
    pub(crate) fn read(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn write(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Write {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn parse(path: &Path) -> impl FnOnce(ron::error::SpannedError) -> Self + '_ {
        move |source| Self::Parse {
            path: path.to_path_buf(),
            source,
        }
    }

    /// File the error refers to, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Read { path, .. } | Self::Write { path, .. } | Self::Parse { path, .. } => {
                Some(path)
            }
            Self::Serialize(_) => None,
        }
    }
}
