use crate::http::request::{Method, Request};
use std::fmt;

/// Blank line ending the header section of a request.
pub const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No header terminator in the buffer yet.
    Incomplete,
    /// Header block is not valid UTF-8.
    InvalidEncoding,
    /// Request line has fewer than two tokens.
    MalformedRequestLine,
    /// Method token is anything other than `GET`.
    UnsupportedMethod(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Incomplete => write!(f, "request header block is incomplete"),
            ParseError::InvalidEncoding => write!(f, "request header block is not valid UTF-8"),
            ParseError::MalformedRequestLine => write!(f, "malformed request line"),
            ParseError::UnsupportedMethod(m) => write!(f, "unsupported method {:?}", m),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parses the request line out of `buf`.
///
/// `buf` must hold a full header block; anything after the terminator is
/// ignored since request bodies are never read.
pub fn parse_http_request(buf: &[u8]) -> Result<Request, ParseError> {
    let headers_end = find_headers_end(buf).ok_or(ParseError::Incomplete)?;

    let headers_str =
        std::str::from_utf8(&buf[..headers_end]).map_err(|_| ParseError::InvalidEncoding)?;

    // Request line
    let request_line = headers_str.split("\r\n").next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();

    let method_str = parts.next().ok_or(ParseError::MalformedRequestLine)?;

    let method = Method::from_str(method_str)
        .ok_or_else(|| ParseError::UnsupportedMethod(method_str.to_string()))?;

    let path = parts.next().ok_or(ParseError::MalformedRequestLine)?;

    Ok(Request::new(method, path))
}

/// Offset of the header terminator in `buf`, if present.
pub fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(HEADER_TERMINATOR.len())
        .position(|w| w == HEADER_TERMINATOR)
}
