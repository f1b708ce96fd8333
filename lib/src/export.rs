//! Implementation of the `export` command.

use camino::Utf8Path;

use crate::cli::ExportOpts;
use crate::console::Console;
use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::request::TransferRequest;
use crate::source::open_sink;
use crate::transport::{StreamOpts, Transport};

/// A validated export. Nothing has been opened or contacted yet.
#[derive(Debug)]
pub(crate) struct Export<'a> {
    output: Option<&'a Utf8Path>,
    request: TransferRequest,
    endpoint: Endpoint,
}

impl<'a> Export<'a> {
    /// Resolve the mode and the daemon endpoint.
    pub(crate) fn prepare(opts: &'a ExportOpts) -> Result<Self> {
        let request = TransferRequest::export(&opts.container, opts.diff, opts.metadata)?;
        let endpoint = Endpoint::for_request(&request)?;
        Ok(Self {
            output: opts.output.as_deref(),
            request,
            endpoint,
        })
    }

    /// Stream the container's content, diff or metadata archive to a file
    /// or to standard output.
    ///
    /// The output is opened before the daemon is contacted. If the transfer
    /// fails midway an output file is left as-is.
    pub(crate) fn run(self, transport: &dyn Transport, console: &mut Console<'_>) -> Result<()> {
        let mut sink = open_sink(self.output, console)?;
        tracing::debug!("Exporting {} of {}", self.request.mode, self.request.target);
        let r = transport.stream(
            self.endpoint.method,
            &self.endpoint.request_path(),
            StreamOpts {
                input: None,
                output: Some(&mut sink),
                raw_mode: true,
            },
        );
        if r.is_err() {
            if let Some(path) = self.output {
                tracing::warn!("Export failed; {path} may be incomplete");
            }
        }
        Ok(r?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::fixture::{RecordedCall, RecordingTransport};
    use crate::transport::{Method, TransportError};
    use camino::Utf8PathBuf;

    fn export(opts: &ExportOpts, transport: &dyn Transport, console: &mut Console<'_>) -> Result<()> {
        Export::prepare(opts)?.run(transport, console)
    }

    fn opts(output: Option<Utf8PathBuf>, diff: bool, metadata: bool) -> ExportOpts {
        ExportOpts {
            output,
            diff,
            metadata,
            container: "mycontainer".into(),
        }
    }

    #[test]
    fn test_export_to_file() {
        let td = tempfile::tempdir().unwrap();
        let path = Utf8Path::from_path(td.path()).unwrap().join("out.tar");
        let transport = RecordingTransport::responding(b"tar-bytes");
        let (mut out, mut err) = (Vec::new(), Vec::new());
        // The terminal check only applies to standard output
        let mut console = Console::new(std::io::empty(), &mut out, &mut err, true);
        export(&opts(Some(path.clone()), false, false), &transport, &mut console).unwrap();
        drop(console);
        similar_asserts::assert_eq!(
            transport.calls(),
            vec![RecordedCall {
                method: Method::Get,
                path: "containers/mycontainer/export".into(),
                body: None,
                raw_mode: true,
            }]
        );
        assert_eq!(std::fs::read(&path).unwrap(), b"tar-bytes");
        assert!(out.is_empty());
    }

    #[test]
    fn test_export_modes_to_stdout() {
        for (diff, metadata, path) in [
            (false, false, "containers/mycontainer/export"),
            (true, false, "containers/mycontainer/diff"),
            (false, true, "containers/mycontainer/metadata"),
        ] {
            let transport = RecordingTransport::responding(b"payload");
            let (mut out, mut err) = (Vec::new(), Vec::new());
            let mut console = Console::new(std::io::empty(), &mut out, &mut err, false);
            export(&opts(None, diff, metadata), &transport, &mut console).unwrap();
            drop(console);
            let calls = transport.calls();
            assert_eq!(calls.len(), 1);
            assert_eq!(calls[0].path, path);
            assert_eq!(out, b"payload");
        }
    }

    #[test]
    fn test_export_diff_and_metadata() {
        let td = tempfile::tempdir().unwrap();
        let path = Utf8Path::from_path(td.path()).unwrap().join("out.tar");
        let transport = RecordingTransport::default();
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let mut console = Console::new(std::io::empty(), &mut out, &mut err, false);
        let r = export(&opts(Some(path.clone()), true, true), &transport, &mut console);
        assert!(matches!(r, Err(Error::InvalidArguments(_))));
        assert!(transport.calls().is_empty());
        // Nothing was created either
        assert!(!path.exists());
    }

    #[test]
    fn test_export_refuses_terminal() {
        let transport = RecordingTransport::default();
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let mut console = Console::new(std::io::empty(), &mut out, &mut err, true);
        let r = export(&opts(None, false, false), &transport, &mut console);
        assert!(matches!(r, Err(Error::UnsafeOutput)));
        assert!(transport.calls().is_empty());
    }

    #[test]
    fn test_export_uncreatable_output() {
        let td = tempfile::tempdir().unwrap();
        let path = Utf8Path::from_path(td.path()).unwrap().join("missing/out.tar");
        let transport = RecordingTransport::default();
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let mut console = Console::new(std::io::empty(), &mut out, &mut err, false);
        let r = export(&opts(Some(path), false, false), &transport, &mut console);
        assert!(matches!(r, Err(Error::Io { .. })));
        assert!(transport.calls().is_empty());
    }

    #[test]
    fn test_export_transfer_failure_keeps_partial_file() {
        let td = tempfile::tempdir().unwrap();
        let path = Utf8Path::from_path(td.path()).unwrap().join("out.tar");
        let transport = RecordingTransport {
            response: b"partial".to_vec(),
            fail_with_status: Some(500),
            ..Default::default()
        };
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let mut console = Console::new(std::io::empty(), &mut out, &mut err, false);
        let r = export(&opts(Some(path.clone()), false, false), &transport, &mut console);
        match r {
            Err(Error::Transfer(TransportError::Status { status, .. })) => assert_eq!(status, 500),
            o => panic!("Expected transfer error, not {o:?}"),
        }
        assert_eq!(std::fs::read(&path).unwrap(), b"partial");
    }
}
