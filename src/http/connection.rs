use bytes::BytesMut;
use std::fmt;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::config::ServerConfig;
use crate::files::{ContentLoader, PathResolver, ResolvedLocation};
use crate::http::parser::{ParseError, find_headers_end, parse_http_request};
use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};
use crate::http::writer::ResponseWriter;

/// Bytes requested from the socket per read.
const READ_CHUNK: usize = 1024;

/// Per-connection resource limits.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionLimits {
    /// Bytes that may accumulate before the header terminator shows up.
    pub max_request_bytes: usize,
    /// Timeout for each individual read; `None` waits forever.
    pub read_timeout: Option<Duration>,
}

impl Default for ConnectionLimits {
    fn default() -> Self {
        Self {
            max_request_bytes: 8192,
            read_timeout: None,
        }
    }
}

impl From<&ServerConfig> for ConnectionLimits {
    fn from(cfg: &ServerConfig) -> Self {
        Self {
            max_request_bytes: cfg.max_request_bytes,
            read_timeout: cfg.read_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Failures that drop the connection without sending a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    RequestTooLarge { limit: usize },
    ReadTimeout(Duration),
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionError::RequestTooLarge { limit } => {
                write!(f, "request headers exceed {} bytes", limit)
            }
            ConnectionError::ReadTimeout(d) => {
                write!(f, "no data from client within {:?}", d)
            }
        }
    }
}

impl std::error::Error for ConnectionError {}

pub enum ConnectionState {
    Reading,
    Parsing,
    Resolving(Request),
    Loading(ResolvedLocation),
    Responding(ResponseWriter, StatusCode),
    Closed,
}

/// Drives a single request/response exchange over `stream`.
pub struct Connection<'a, S> {
    stream: S,
    buffer: BytesMut,
    state: ConnectionState,
    resolver: &'a PathResolver,
    loader: ContentLoader,
    limits: ConnectionLimits,
}

impl<'a, S> Connection<'a, S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, resolver: &'a PathResolver, limits: ConnectionLimits) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(READ_CHUNK),
            state: ConnectionState::Reading,
            resolver,
            loader: ContentLoader::new(),
            limits,
        }
    }

    /// Runs the connection to completion.
    ///
    /// Returns `Ok` once a response has been written, or when the client went
    /// away before sending a full request. Any error means the connection is
    /// abandoned without a response; dropping `self` closes the stream either
    /// way.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            let state = std::mem::replace(&mut self.state, ConnectionState::Closed);

            self.state = match state {
                ConnectionState::Reading => {
                    if self.read_request().await? {
                        ConnectionState::Parsing
                    } else {
                        tracing::debug!(
                            buffered = self.buffer.len(),
                            "Client closed before completing request"
                        );
                        ConnectionState::Closed
                    }
                }

                ConnectionState::Parsing => match parse_http_request(&self.buffer) {
                    Ok(req) => {
                        tracing::debug!(method = %req.method, path = %req.path, "Parsed request");
                        ConnectionState::Resolving(req)
                    }
                    Err(
                        e @ (ParseError::UnsupportedMethod(_) | ParseError::MalformedRequestLine),
                    ) => {
                        tracing::debug!(error = %e, "Rejecting request");
                        Self::respond(Response::method_not_allowed())
                    }
                    Err(e) => return Err(e.into()),
                },

                ConnectionState::Resolving(req) => match self.resolver.resolve(&req.path).await {
                    Ok(location) => ConnectionState::Loading(location),
                    Err(e) if e.is_not_found() => {
                        tracing::debug!(path = %req.path, error = %e, "Nothing to serve");
                        Self::respond(Response::not_found())
                    }
                    Err(e) => return Err(e.into()),
                },

                ConnectionState::Loading(location) => match self.loader.load(&location).await {
                    Ok(content) => Self::respond(Response::ok(content.body, content.content_type)),
                    Err(e) if e.is_not_found() => Self::respond(Response::not_found()),
                    Err(e) => {
                        return Err(anyhow::Error::new(e)
                            .context(format!("failed to load {}", location.path.display())));
                    }
                },

                ConnectionState::Responding(mut writer, status) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    self.stream.shutdown().await?;

                    tracing::info!(
                        status = status.as_u16(),
                        bytes = writer.bytes_written(),
                        "Response sent"
                    );
                    ConnectionState::Closed
                }

                ConnectionState::Closed => break,
            };
        }

        Ok(())
    }

    fn respond(response: Response) -> ConnectionState {
        ConnectionState::Responding(ResponseWriter::new(&response), response.status)
    }

    /// Reads until the header terminator is buffered.
    ///
    /// Never buffers more than `max_request_bytes`. Returns `false` if the
    /// client closed the connection first.
    async fn read_request(&mut self) -> anyhow::Result<bool> {
        loop {
            if find_headers_end(&self.buffer).is_some() {
                return Ok(true);
            }

            let remaining = self
                .limits
                .max_request_bytes
                .saturating_sub(self.buffer.len());
            if remaining == 0 {
                return Err(ConnectionError::RequestTooLarge {
                    limit: self.limits.max_request_bytes,
                }
                .into());
            }

            self.buffer.reserve(READ_CHUNK.min(remaining));
            let mut limited = (&mut self.stream).take(remaining as u64);
            let read = limited.read_buf(&mut self.buffer);
            let n = match self.limits.read_timeout {
                Some(limit) => tokio::time::timeout(limit, read)
                    .await
                    .map_err(|_| ConnectionError::ReadTimeout(limit))??,
                None => read.await?,
            };

            tracing::trace!(bytes = n, buffered = self.buffer.len(), "Read from client");

            if n == 0 {
                return Ok(false);
            }
        }
    }
}
