//! # Streaming requests against the daemon
//!
//! A single request/response exchange whose request body and/or
//! response body is an opaque byte stream (typically a tar archive).

use std::io::{Read, Write};

use reqwest::blocking::{Body, Client};
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;
use url::Url;

/// Content type of a raw, un-reframed request body.
const RAW_STREAM_CONTENT_TYPE: &str = "application/x-tar";

/// The request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Read from the daemon.
    Get,
    /// Write to the daemon.
    Post,
}

/// Errors from the transport.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum TransportError {
    #[error("invalid daemon address {address:?}: {err}")]
    InvalidUrl {
        address: String,
        err: url::ParseError,
    },
    #[error("error during connect: {0}")]
    Http(#[from] reqwest::Error),
    #[error("daemon returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("streaming body: {0}")]
    Io(#[from] std::io::Error),
    #[error("only raw streams are supported")]
    Framing,
}

/// The input and output of one streamed exchange.
pub struct StreamOpts<'a> {
    /// Sent as the request body.
    pub input: Option<Box<dyn Read + Send>>,
    /// Receives the response body.
    pub output: Option<&'a mut dyn Write>,
    /// The bytes are passed through without any protocol framing.
    pub raw_mode: bool,
}

impl std::fmt::Debug for StreamOpts<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamOpts")
            .field("input", &self.input.is_some())
            .field("output", &self.output.is_some())
            .field("raw_mode", &self.raw_mode)
            .finish()
    }
}

/// Something that can perform a streamed exchange with the daemon.
pub trait Transport {
    /// Send one request to `path` (relative to the API root, including any
    /// query) and stream the bodies per `opts`. Errors are not retried; an
    /// output may have been partially written when this fails.
    fn stream(&self, method: Method, path: &str, opts: StreamOpts<'_>)
        -> Result<(), TransportError>;
}

/// A [`Transport`] speaking HTTP to a daemon at a base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base: Url,
}

impl HttpTransport {
    /// Create a transport for the daemon at `base`. No connection is made
    /// until the first request.
    pub fn new(base: Url, user_agent: &str) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(user_agent)
            // Archives can take arbitrarily long to stream.
            .timeout(None::<std::time::Duration>)
            .build()?;
        Ok(Self { client, base })
    }

    fn url_for(&self, path: &str) -> Result<Url, TransportError> {
        self.base
            .join(path)
            .map_err(|err| TransportError::InvalidUrl {
                address: format!("{}{path}", self.base),
                err,
            })
    }
}

impl Transport for HttpTransport {
    fn stream(
        &self,
        method: Method,
        path: &str,
        opts: StreamOpts<'_>,
    ) -> Result<(), TransportError> {
        if !opts.raw_mode {
            return Err(TransportError::Framing);
        }
        let url = self.url_for(path)?;
        tracing::debug!("{method:?} {url}");
        let mut req = match method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };
        if let Some(input) = opts.input {
            req = req
                .header(CONTENT_TYPE, RAW_STREAM_CONTENT_TYPE)
                .body(Body::new(input));
        }
        let mut resp = req.send()?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                message: message.trim().to_string(),
            });
        }
        if let Some(output) = opts.output {
            let n = std::io::copy(&mut resp, output)?;
            output.flush()?;
            tracing::debug!("Received {n} bytes");
        }
        Ok(())
    }
}
