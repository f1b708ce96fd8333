//! Implementation of the `import` command.

use std::io::Write;

use crate::cli::ImportOpts;
use crate::console::Console;
use crate::endpoint::{Endpoint, FROM_SRC};
use crate::error::Result;
use crate::request::TransferRequest;
use crate::source::{ImportSource, STDIN_TOKEN};
use crate::transport::{StreamOpts, Transport};

/// A validated import. The source has not been opened and the daemon has
/// not been contacted yet.
#[derive(Debug)]
pub(crate) struct Import {
    request: TransferRequest,
    endpoint: Endpoint,
}

impl Import {
    /// Resolve the destination, the mode and the daemon endpoint. The
    /// deprecation notice for the legacy argument form goes to `stderr`.
    pub(crate) fn prepare(opts: &ImportOpts, stderr: &mut dyn Write) -> Result<Self> {
        let destination = opts.destination(stderr)?;
        let request = TransferRequest::import(
            &opts.source,
            destination,
            &opts.diff,
            opts.metadata,
            &opts.changes,
            opts.message.as_deref(),
        )?;
        let endpoint = Endpoint::for_request(&request)?;
        Ok(Self { request, endpoint })
    }

    /// Send the tarball (or a URL for the daemon to fetch) to create an
    /// image, or to apply a diff or metadata archive to an existing
    /// container. The daemon's response is copied to standard output.
    pub(crate) fn run(self, transport: &dyn Transport, console: &mut Console<'_>) -> Result<()> {
        let Self {
            request,
            mut endpoint,
        } = self;
        let source = ImportSource::classify(request.source.as_deref().unwrap_or(STDIN_TOKEN));
        // A local file is dropped, and thereby closed, on every return path below
        let input = source.open(console)?;
        endpoint.replace_param(FROM_SRC, source.from_src());
        tracing::debug!("Importing {} from {source:?}", request.mode);
        transport.stream(
            endpoint.method,
            &endpoint.request_path(),
            StreamOpts {
                input,
                output: Some(&mut console.stdout),
                raw_mode: true,
            },
        )?;
        Ok(())
    }
}
