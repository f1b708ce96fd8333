//! Errors returned by the export and import commands.

use camino::Utf8PathBuf;
use ctrctl_utils::ShellQuoted;
use thiserror::Error;

pub use crate::reference::InvalidRepositoryName;
pub use crate::transport::TransportError;

/// An error from one of the transfer commands; none of these are retried.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum Error {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("I/O error on {}: {err}", ShellQuoted::new(.path))]
    Io {
        path: Utf8PathBuf,
        err: std::io::Error,
    },
    #[error("refusing to write binary archive data to a terminal; supply a file with -o or redirect")]
    UnsafeOutput,
    #[error(transparent)]
    InvalidRepositoryName(#[from] InvalidRepositoryName),
    #[error(transparent)]
    Transfer(#[from] TransportError),
}

impl Error {
    pub(crate) fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }
}

/// The type of Result.
pub type Result<T> = std::result::Result<T, Error>;
