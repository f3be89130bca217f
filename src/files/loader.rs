//! Loading resolved locations
//!
//! Files are read whole. Directories become a comma-separated listing of
//! their immediate entries, in whatever order the OS enumerates them.

use crate::files::resolver::{LocationKind, ResolvedLocation};
use crate::files::FileError;
use crate::http::mime;

/// Separator between entry names in a directory listing.
const LISTING_SEPARATOR: &str = ", ";

/// Body bytes plus the content type to announce for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    pub body: Vec<u8>,
    pub content_type: String,
}

/// Produces response content for resolved locations.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentLoader;

impl ContentLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load the file contents or directory listing at `location`.
    ///
    /// An entry that vanished since it was resolved reports `NotFound`; other
    /// I/O failures come back as `FileError::Io`.
    pub async fn load(&self, location: &ResolvedLocation) -> Result<Content, FileError> {
        match location.kind {
            LocationKind::File => self.load_file(location).await,
            LocationKind::Directory => self.load_directory(location).await,
        }
    }

    async fn load_file(&self, location: &ResolvedLocation) -> Result<Content, FileError> {
        let body = tokio::fs::read(&location.path).await?;
        let content_type = mime::content_type_for(&location.path);

        tracing::trace!(
            path = %location.path.display(),
            bytes = body.len(),
            content_type,
            "Loaded file"
        );

        Ok(Content {
            body,
            content_type: content_type.to_string(),
        })
    }

    async fn load_directory(&self, location: &ResolvedLocation) -> Result<Content, FileError> {
        let mut entries = tokio::fs::read_dir(&location.path).await?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }

        tracing::trace!(
            path = %location.path.display(),
            entries = names.len(),
            "Listed directory"
        );

        Ok(Content {
            body: names.join(LISTING_SEPARATOR).into_bytes(),
            content_type: mime::TEXT_PLAIN.to_string(),
        })
    }
}
