//! webroot - Single-connection static file server
//!
//! Core library for HTTP handling and web-root file serving.

pub mod config;
pub mod files;
pub mod http;
pub mod server;
