//! Resolution of the mutually exclusive transfer modes.

use crate::error::{Error, Result};

/// Which part of a container a transfer concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    /// The whole filesystem content.
    Full,
    /// The filesystem changeset of a container relative to its base image.
    Diff,
    /// The configuration/state snapshot of a container.
    Metadata,
}

impl TransferMode {
    /// Resolve the mode for `export` from its `--diff` and `--metadata` flags.
    pub fn for_export(diff: bool, metadata: bool) -> Result<Self> {
        match (diff, metadata) {
            (true, true) => Err(Error::invalid_arguments(
                "diff and metadata are mutually exclusive options; use either one of them, not both",
            )),
            (true, false) => Ok(Self::Diff),
            (false, true) => Ok(Self::Metadata),
            (false, false) => Ok(Self::Full),
        }
    }

    /// Resolve the mode for `import`. Here `--diff` names the container the
    /// diff is applied to; an empty string means unset.
    pub fn for_import(diff: &str, metadata: bool) -> Result<Self> {
        match (!diff.is_empty(), metadata) {
            (true, true) => Err(Error::invalid_arguments(
                "diff and metadata are sequential, not simultaneous; import the diff after the container's metadata is loaded",
            )),
            (true, false) => Ok(Self::Diff),
            (false, true) => Ok(Self::Metadata),
            (false, false) => Ok(Self::Full),
        }
    }
}

impl std::fmt::Display for TransferMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Full => "full",
            Self::Diff => "diff",
            Self::Metadata => "metadata",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_modes() {
        assert_eq!(TransferMode::for_export(false, false).unwrap(), TransferMode::Full);
        assert_eq!(TransferMode::for_export(true, false).unwrap(), TransferMode::Diff);
        assert_eq!(TransferMode::for_export(false, true).unwrap(), TransferMode::Metadata);
        match TransferMode::for_export(true, true) {
            Err(Error::InvalidArguments(msg)) => assert!(msg.contains("mutually exclusive")),
            o => panic!("Expected invalid arguments, not {o:?}"),
        }
    }

    #[test]
    fn test_import_modes() {
        assert_eq!(TransferMode::for_import("", false).unwrap(), TransferMode::Full);
        assert_eq!(TransferMode::for_import("c1", false).unwrap(), TransferMode::Diff);
        assert_eq!(TransferMode::for_import("", true).unwrap(), TransferMode::Metadata);
        match TransferMode::for_import("c1", true) {
            Err(Error::InvalidArguments(msg)) => {
                assert!(msg.contains("sequential, not simultaneous"))
            }
            o => panic!("Expected invalid arguments, not {o:?}"),
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(TransferMode::Metadata.to_string(), "metadata");
    }
}
