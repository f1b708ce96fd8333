//! # Where transferred bytes come from and go to
//!
//! An import reads from standard input, a local file, or nothing at all
//! when the daemon fetches a remote URL itself. An export writes to a file
//! or to standard output, but never to an interactive terminal.

use std::io::{Read, Write};

use camino::{Utf8Path, Utf8PathBuf};

use crate::console::Console;
use crate::error::{Error, Result};

/// The token naming standard input.
pub const STDIN_TOKEN: &str = "-";

/// Whether an import source is a remote URL for the daemon to fetch.
pub fn is_url(token: &str) -> bool {
    token.starts_with("http://") || token.starts_with("https://")
}

/// The source of an import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportSource {
    /// The process's standard input.
    Stdin,
    /// A URL passed through to the daemon.
    Remote(String),
    /// A file on the local filesystem.
    LocalFile(Utf8PathBuf),
}

impl ImportSource {
    /// Classify a `file|URL|-` token.
    pub fn classify(token: &str) -> Self {
        if token == STDIN_TOKEN {
            Self::Stdin
        } else if is_url(token) {
            Self::Remote(token.to_string())
        } else {
            Self::LocalFile(token.into())
        }
    }

    /// The `fromSrc` value announcing this source to the daemon; anything
    /// we stream ourselves is `-`.
    pub fn from_src(&self) -> &str {
        match self {
            Self::Stdin | Self::LocalFile(_) => STDIN_TOKEN,
            Self::Remote(url) => url.as_str(),
        }
    }

    /// Open the request body, if any. A local file is closed when the
    /// returned reader is dropped.
    pub(crate) fn open(&self, console: &mut Console<'_>) -> Result<Option<Box<dyn Read + Send>>> {
        match self {
            Self::Stdin => Ok(Some(console.take_stdin())),
            Self::Remote(_) => Ok(None),
            Self::LocalFile(path) => {
                let f = std::fs::File::open(path).map_err(|err| Error::Io {
                    path: path.clone(),
                    err,
                })?;
                tracing::debug!("Opened {path}");
                Ok(Some(Box::new(f)))
            }
        }
    }
}

/// Resolve the destination of an export: the given file (created or
/// truncated), else standard output as long as it is not a terminal.
pub(crate) fn open_sink<'c>(
    output: Option<&Utf8Path>,
    console: &'c mut Console<'_>,
) -> Result<Box<dyn Write + 'c>> {
    if let Some(path) = output {
        let f = std::fs::File::create(path).map_err(|err| Error::Io {
            path: path.to_owned(),
            err,
        })?;
        return Ok(Box::new(f));
    }
    if console.stdout_is_terminal() {
        return Err(Error::UnsafeOutput);
    }
    Ok(Box::new(&mut console.stdout))
}
