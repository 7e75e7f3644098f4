//! Static site builder for mdsite.
//!
//! Converts a tree of markdown sources into a mirrored tree of HTML pages.
//! Each source directory may carry reserved entries (see [`SiteLayout`]):
//!
//! - a page template, itself markdown, nested inside the parent's template
//! - a stylesheet folder, bundled into one file in the shared static folder
//! - an asset folder, whose files are copied and renamed on first reference
//!
//! # Example
//!
//! ```no_run
//! use mdsite_site::SiteBuilder;
//!
//! let summary = SiteBuilder::new("input", "output").build()?;
//! println!("{} pages", summary.pages);
//! # Ok::<(), mdsite_site::SiteError>(())
//! ```

mod assets;
mod context;
mod error;
mod layout;
mod page;
mod root;
mod styles;

use std::path::PathBuf;

pub use context::{Context, Converted};
pub use error::SiteError;
pub use layout::SiteLayout;
pub use root::{BuildSummary, IdSource, SiteRoot};

/// Builds a whole site from a source directory.
#[derive(Debug, Clone)]
pub struct SiteBuilder {
    source_dir: PathBuf,
    output_dir: PathBuf,
    layout: SiteLayout,
    debug_logs: bool,
}

impl SiteBuilder {
    /// Create a builder with the default layout.
    #[must_use]
    pub fn new(source_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
            layout: SiteLayout::default(),
            debug_logs: false,
        }
    }

    #[must_use]
    pub fn with_layout(mut self, layout: SiteLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Write `<stem>.log` node-tree dumps next to the pages.
    #[must_use]
    pub fn with_debug_logs(mut self, enabled: bool) -> Self {
        self.debug_logs = enabled;
        self
    }

    /// Build the site, replacing any previous contents of the output directory.
    pub fn build(&self) -> Result<BuildSummary, SiteError> {
        // Checked before the output directory is wiped.
        if !self.source_dir.is_dir() {
            return Err(SiteError::SourceNotFound(self.source_dir.clone()));
        }

        let root = SiteRoot::create(&self.output_dir, self.layout.clone())?
            .with_debug_logs(self.debug_logs);
        Context::root(&root, &self.source_dir)?.process()?;

        let summary = root.summary();
        tracing::info!(
            pages = summary.pages,
            directories = summary.directories,
            stylesheets = summary.stylesheets,
            assets = summary.assets,
            "Site built"
        );
        Ok(summary)
    }
}
