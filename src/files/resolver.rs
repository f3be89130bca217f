//! Request path → filesystem location
//!
//! The resolver joins a request path under the web root and canonicalizes the
//! result. A location is only handed out if its canonical form still starts
//! with the canonical root, so `..` segments, absolute paths and symbolic
//! links cannot reach anything outside the root.

use crate::files::FileError;
use anyhow::Context;
use std::path::{Path, PathBuf};

/// What sits at a resolved location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationKind {
    File,
    Directory,
}

/// A canonical path inside the web root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    pub path: PathBuf,
    pub kind: LocationKind,
}

/// Maps request paths onto a fixed root directory.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    /// Create a resolver for `root`.
    ///
    /// Fails if `root` does not exist or is not a directory.
    pub fn new(root: impl AsRef<Path>) -> anyhow::Result<Self> {
        let root = root.as_ref();
        let canonical = root
            .canonicalize()
            .with_context(|| format!("web root {} is not accessible", root.display()))?;

        if !canonical.is_dir() {
            anyhow::bail!("web root {} is not a directory", canonical.display());
        }

        Ok(Self { root: canonical })
    }

    /// Canonical web root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a raw request path to a location under the root.
    pub async fn resolve(&self, request_path: &str) -> Result<ResolvedLocation, FileError> {
        let relative = strip_leading_separator(request_path);
        let joined = self.root.join(relative);

        // Any failure here means there is nothing we are willing to serve.
        let canonical = tokio::fs::canonicalize(&joined)
            .await
            .map_err(|_| FileError::NotFound)?;

        if !canonical.starts_with(&self.root) {
            tracing::warn!(
                path = %request_path,
                resolved = %canonical.display(),
                "Rejected path outside web root"
            );
            return Err(FileError::OutsideRoot);
        }

        let metadata = tokio::fs::metadata(&canonical)
            .await
            .map_err(|_| FileError::NotFound)?;
        let kind = if metadata.is_dir() {
            LocationKind::Directory
        } else if metadata.is_file() {
            LocationKind::File
        } else {
            return Err(FileError::NotFound);
        };

        tracing::trace!(path = %request_path, resolved = %canonical.display(), ?kind, "Resolved");

        Ok(ResolvedLocation {
            path: canonical,
            kind,
        })
    }
}

fn strip_leading_separator(path: &str) -> &str {
    path.strip_prefix('/')
        .or_else(|| path.strip_prefix('\\'))
        .unwrap_or(path)
}
