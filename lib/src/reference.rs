//! # Parsing and validation of repository names
//!
//! A destination for `import` is given as `REPOSITORY[:TAG]`, where the
//! repository may be prefixed by a registry hostname such as
//! `registry.example.com:5000/team/app`.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Registry assumed when the name does not carry one.
pub const DEFAULT_INDEX: &str = "docker.io";
const MAX_NAME_LEN: usize = 255;
const COMPONENT_PATTERN: &str = "^[a-z0-9]+(?:[._-][a-z0-9]+)*$";
const TAG_PATTERN: &str = r"^[\w][\w.-]{0,127}$";

/// Why a repository name or tag was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum InvalidRepositoryName {
    #[error("repository name can't be empty")]
    Empty,
    #[error("'scratch' is a reserved name")]
    Reserved,
    #[error("invalid repository name ({0}), cannot specify 64-byte hexadecimal strings")]
    HexadecimalId(String),
    #[error("repository name must not be more than 255 characters")]
    TooLong,
    #[error("invalid repository name component {0:?}; must match [a-z0-9]+(?:[._-][a-z0-9]+)*")]
    Component(String),
    #[error("invalid tag {0:?}")]
    Tag(String),
}

fn component_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(COMPONENT_PATTERN).unwrap())
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(TAG_PATTERN).unwrap())
}

/// Split `REPOSITORY[:TAG]` (or `REPOSITORY@DIGEST`) into its two halves.
///
/// A `:` followed by a path separator belongs to a registry port, not a tag.
pub fn parse_repository_tag(spec: &str) -> (&str, Option<&str>) {
    if let Some((name, digest)) = spec.rsplit_once('@') {
        return (name, Some(digest));
    }
    match spec.rsplit_once(':') {
        Some((name, tag)) if !tag.contains('/') => (name, Some(tag)),
        _ => (spec, None),
    }
}

/// Split off the registry hostname, if any, from the remote name.
pub fn split_index_name(name: &str) -> (&str, &str) {
    match name.split_once('/') {
        Some((index, remote))
            if index.contains('.') || index.contains(':') || index == "localhost" =>
        {
            (index, remote)
        }
        _ => (DEFAULT_INDEX, name),
    }
}

fn is_hexadecimal_id(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Check that a repository name (without its tag) is acceptable as an
/// image destination.
pub fn validate_repository_name(name: &str) -> Result<(), InvalidRepositoryName> {
    if name.is_empty() {
        return Err(InvalidRepositoryName::Empty);
    }
    if name == "scratch" {
        return Err(InvalidRepositoryName::Reserved);
    }
    let (_index, remote) = split_index_name(name);
    if !remote.contains('/') && is_hexadecimal_id(remote) {
        return Err(InvalidRepositoryName::HexadecimalId(remote.to_string()));
    }
    if remote.len() > MAX_NAME_LEN {
        return Err(InvalidRepositoryName::TooLong);
    }
    if let Some(bad) = remote.split('/').find(|c| !component_re().is_match(c)) {
        return Err(InvalidRepositoryName::Component(bad.to_string()));
    }
    Ok(())
}

/// Check a tag; digests (`algorithm:hex`) are passed through unchecked.
pub fn validate_tag(tag: &str) -> Result<(), InvalidRepositoryName> {
    if tag.contains(':') || tag_re().is_match(tag) {
        Ok(())
    } else {
        Err(InvalidRepositoryName::Tag(tag.to_string()))
    }
}
