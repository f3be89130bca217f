//! Static file serving
//!
//! This module maps request paths onto the web root and loads what it finds
//! there: file contents, or a plain-text listing for directories.

pub mod loader;
pub mod resolver;

pub use loader::{Content, ContentLoader};
pub use resolver::{LocationKind, PathResolver, ResolvedLocation};

use std::fmt;
use std::io;

/// Failures while resolving or loading a path.
#[derive(Debug)]
pub enum FileError {
    /// Nothing servable exists at the path.
    NotFound,
    /// The path resolves outside the web root.
    OutsideRoot,
    /// Any other I/O failure while reading.
    Io(io::Error),
}

impl FileError {
    /// Whether this failure should be answered with 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FileError::NotFound | FileError::OutsideRoot)
    }
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::NotFound => write!(f, "no such file or directory under root"),
            FileError::OutsideRoot => write!(f, "path escapes the web root"),
            FileError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FileError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => FileError::NotFound,
            _ => FileError::Io(e),
        }
    }
}
