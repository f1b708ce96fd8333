//! Test fixtures: a [`Transport`] that records requests instead of making them.

use std::cell::RefCell;
use std::io::Read;

use crate::transport::{Method, StreamOpts, Transport, TransportError};

/// One request as seen by [`RecordingTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordedCall {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) body: Option<Vec<u8>>,
    pub(crate) raw_mode: bool,
}

/// Answers every request with a fixed response body, or fails after
/// writing it when `fail_with_status` is set.
#[derive(Debug, Default)]
pub(crate) struct RecordingTransport {
    pub(crate) response: Vec<u8>,
    pub(crate) fail_with_status: Option<u16>,
    pub(crate) calls: RefCell<Vec<RecordedCall>>,
}

impl RecordingTransport {
    pub(crate) fn responding(response: &[u8]) -> Self {
        Self {
            response: response.to_vec(),
            ..Default::default()
        }
    }

    pub(crate) fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }
}

impl Transport for RecordingTransport {
    fn stream(
        &self,
        method: Method,
        path: &str,
        opts: StreamOpts<'_>,
    ) -> Result<(), TransportError> {
        let body = match opts.input {
            Some(mut input) => {
                let mut buf = Vec::new();
                input.read_to_end(&mut buf)?;
                Some(buf)
            }
            None => None,
        };
        self.calls.borrow_mut().push(RecordedCall {
            method,
            path: path.to_string(),
            body,
            raw_mode: opts.raw_mode,
        });
        if let Some(output) = opts.output {
            output.write_all(&self.response)?;
        }
        match self.fail_with_status {
            Some(status) => Err(TransportError::Status {
                status,
                message: "connection reset".into(),
            }),
            None => Ok(()),
        }
    }
}
