//! HTTP protocol implementation.
//!
//! This module implements the small slice of HTTP/1.1 the server speaks: one
//! GET request per connection, answered with 200, 404 or 405 and then closed.
//!
//! # Architecture
//!
//! - **`connection`**: The connection handler implementing the request-response state machine
//! - **`parser`**: Extracts the request line from a buffered header block
//! - **`request`**: HTTP request representation
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: Serializes and writes HTTP responses to the client
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Buffer bytes until \r\n\r\n
//!        └──────┬──────┘
//!               │ Header block complete
//!               ▼
//!        ┌─────────────┐
//!        │   Parsing   │ ── not GET / malformed ──► 405
//!        └──────┬──────┘
//!               ▼
//!        ┌─────────────┐
//!        │  Resolving  │ ── missing / escapes root ──► 404
//!        └──────┬──────┘
//!               ▼
//!        ┌─────────────┐
//!        │   Loading   │ ── vanished ──► 404
//!        └──────┬──────┘
//!               │ 200
//!               ▼
//!        ┌─────────────┐
//!        │ Responding  │ ← Write response, shut down write half
//!        └──────┬──────┘
//!               ▼
//!        ┌─────────────┐
//!        │   Closed    │
//!        └─────────────┘
//! ```
//!
//! Anything else (oversized request, bad encoding, I/O failure) leaves `run`
//! with an error and the connection is dropped without a response.
//!
//! # Example
//!
//! ```ignore
//! use webroot::files::PathResolver;
//! use webroot::http::connection::{Connection, ConnectionLimits};
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let resolver = PathResolver::new("webroot")?;
//!     let listener = TcpListener::bind("127.0.0.1:10000").await?;
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let mut conn = Connection::new(socket, &resolver, ConnectionLimits::default());
//!         if let Err(e) = conn.run().await {
//!             eprintln!("Connection error: {}", e);
//!         }
//!     }
//! }
//! ```

pub mod request;
pub mod response;
pub mod parser;
pub mod connection;
pub mod writer;
pub mod mime;
