//! # Container content transfer
//!
//! Client side of exporting a container's filesystem (or its diff or
//! metadata) as a streamed tar archive, and of importing a tarball to
//! create an image or apply it to an existing container.
//!
//! Each command runs the same stages in order: mode resolution
//! ([`mode`]), endpoint resolution ([`endpoint`]), source/sink
//! resolution ([`source`]) and a single streamed exchange
//! ([`transport`]). A failure at any stage ends the command.

// See https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]
#![forbid(unused_must_use)]
#![deny(unsafe_code)]
#![deny(clippy::dbg_macro)]
#![deny(clippy::todo)]

pub mod cli;
pub(crate) mod config;
pub mod console;
pub mod endpoint;
pub mod error;
mod export;
mod import;
pub mod mode;
pub mod reference;
pub mod request;
pub mod source;
pub mod transport;

#[cfg(feature = "docgen")]
mod docgen;
#[cfg(test)]
mod fixture;

pub use error::{Error, Result};
