//! Site build errors.

use std::io;
use std::path::{Path, PathBuf};

use mdsite_markdown::ParseError;

/// Error returned while building a site.
///
/// Any of these aborts the whole build. Missing assets are not errors.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Filesystem operation failed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Markdown source (page or template) could not be parsed.
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
    /// Source directory does not exist.
    #[error("Source directory not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    /// Layout names are unusable.
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),
}

impl SiteError {
    /// Build a closure that wraps an I/O error with `path`, for `map_err`.
    pub(crate) fn io(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
