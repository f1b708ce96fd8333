//! The validated description of one transfer.

use crate::error::{Error, Result};
use crate::mode::TransferMode;

/// Which way the bytes flow, relative to the daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Content is read from the daemon.
    Export,
    /// Content is sent to the daemon.
    Import,
}

/// The destination image of a full import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Destination {
    /// `REPOSITORY[:TAG]`.
    pub repository: String,
    /// A tag given as a separate argument (the deprecated
    /// `REPOSITORY TAG` form); wins over a tag inside `repository`.
    pub tag: Option<String>,
}

impl From<&str> for Destination {
    fn from(repository: &str) -> Self {
        Self {
            repository: repository.to_string(),
            tag: None,
        }
    }
}

/// A transfer built fresh from the command line arguments of one
/// invocation, consumed once and then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    /// Which way the bytes flow.
    pub direction: Direction,
    /// Which part of the container is transferred.
    pub mode: TransferMode,
    /// The container for exports and diff imports, the destination
    /// `REPOSITORY[:TAG]` of a full import (empty if none was given), and
    /// empty for metadata imports.
    pub target: String,
    /// A separately given tag for the destination of a full import.
    pub tag: Option<String>,
    /// The `file|URL|-` token of an import.
    pub source: Option<String>,
    /// Dockerfile-style instructions applied to an imported image.
    pub changes: Vec<String>,
    /// Commit message for an imported image.
    pub message: Option<String>,
}

impl TransferRequest {
    /// Describe an export of `container`.
    pub fn export(container: &str, diff: bool, metadata: bool) -> Result<Self> {
        let mode = TransferMode::for_export(diff, metadata)?;
        if container.is_empty() {
            return Err(Error::invalid_arguments("container name must not be empty"));
        }
        // Would be collapsed away as a dot segment of the request path
        if matches!(container, "." | "..") {
            return Err(Error::invalid_arguments(format!(
                "invalid container name {container:?}"
            )));
        }
        Ok(Self {
            direction: Direction::Export,
            mode,
            target: container.to_string(),
            tag: None,
            source: None,
            changes: Vec::new(),
            message: None,
        })
    }

    /// Describe an import from `source` into `destination`.
    pub fn import(
        source: &str,
        destination: Option<Destination>,
        diff: &str,
        metadata: bool,
        changes: &[String],
        message: Option<&str>,
    ) -> Result<Self> {
        let mode = TransferMode::for_import(diff, metadata)?;
        if source.is_empty() {
            return Err(Error::invalid_arguments("import source must not be empty"));
        }
        let destination = destination.unwrap_or_default();
        if mode != TransferMode::Full && !destination.repository.is_empty() {
            tracing::warn!("Ignoring repository argument for a {mode} import");
        }
        let (target, tag) = match mode {
            TransferMode::Full => (destination.repository, destination.tag),
            TransferMode::Diff => (diff.to_string(), None),
            TransferMode::Metadata => (String::new(), None),
        };
        Ok(Self {
            direction: Direction::Import,
            mode,
            target,
            tag,
            source: Some(source.to_string()),
            changes: changes.to_vec(),
            message: message.filter(|m| !m.is_empty()).map(ToOwned::to_owned),
        })
    }
}
