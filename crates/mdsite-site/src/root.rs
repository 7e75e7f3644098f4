//! Shared state of one site build.
//!
//! The root owns everything that must be unique across the whole output:
//! the set of generated identifiers and the shared static output folder.
//! Every [`Context`](crate::Context) in the tree borrows the same root.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use regex::{NoExpand, Regex};
use uuid::Uuid;

use crate::{SiteError, SiteLayout};

/// Source of candidate identifiers. Candidates may repeat.
pub type IdSource = Box<dyn FnMut() -> String>;

/// Random 8-character lowercase hex identifier.
fn random_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

/// Counters reported after a build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub directories: usize,
    pub pages: usize,
    pub stylesheets: usize,
    pub assets: usize,
}

/// Build-wide state shared by every rendering context.
pub struct SiteRoot {
    output_dir: PathBuf,
    static_dir: PathBuf,
    layout: SiteLayout,
    debug_logs: bool,
    placeholder: Regex,
    used_ids: RefCell<HashSet<String>>,
    id_source: RefCell<IdSource>,
    summary: Cell<BuildSummary>,
}

impl SiteRoot {
    /// Prepare a fresh output tree.
    ///
    /// An existing `output_dir` is removed first, then recreated together
    /// with the shared static folder.
    pub fn create(output_dir: &Path, layout: SiteLayout) -> Result<Self, SiteError> {
        layout.validate()?;

        if output_dir.exists() {
            fs::remove_dir_all(output_dir).map_err(SiteError::io(output_dir))?;
        }
        fs::create_dir_all(output_dir).map_err(SiteError::io(output_dir))?;
        let static_dir = output_dir.join(&layout.static_output_dir);
        fs::create_dir(&static_dir).map_err(SiteError::io(&static_dir))?;

        let escaped = regex::escape(&layout.placeholder);
        let placeholder = Regex::new(&format!("<p>{escaped}</p>|{escaped}"))
            .map_err(|e| SiteError::InvalidLayout(e.to_string()))?;

        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            static_dir,
            layout,
            debug_logs: false,
            placeholder,
            used_ids: RefCell::new(HashSet::new()),
            id_source: RefCell::new(Box::new(random_id)),
            summary: Cell::new(BuildSummary::default()),
        })
    }

    /// Write a `.log` node-tree dump next to every converted page.
    #[must_use]
    pub fn with_debug_logs(mut self, enabled: bool) -> Self {
        self.debug_logs = enabled;
        self
    }

    /// Replace the random identifier source.
    #[must_use]
    pub fn with_id_source(mut self, source: IdSource) -> Self {
        self.id_source = RefCell::new(source);
        self
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Shared folder collecting style bundles and renamed assets.
    #[must_use]
    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }

    #[must_use]
    pub fn layout(&self) -> &SiteLayout {
        &self.layout
    }

    #[must_use]
    pub fn debug_logs(&self) -> bool {
        self.debug_logs
    }

    /// Counters accumulated so far.
    #[must_use]
    pub fn summary(&self) -> BuildSummary {
        self.summary.get()
    }

    /// Generate an identifier never returned before by this root.
    pub fn generate_id(&self) -> String {
        let mut used = self.used_ids.borrow_mut();
        let mut source = self.id_source.borrow_mut();
        loop {
            let candidate = (*source)();
            if !used.contains(&candidate) {
                used.insert(candidate.clone());
                return candidate;
            }
            tracing::debug!(id = %candidate, "Identifier collision, retrying");
        }
    }

    /// Substitute `content` for the placeholder in `template`.
    ///
    /// A placeholder that forms a paragraph of its own (`<p>{{content}}</p>`)
    /// is replaced together with the paragraph tags.
    #[must_use]
    pub fn fill_template(&self, template: &str, content: &str) -> String {
        self.placeholder
            .replace_all(template, NoExpand(content))
            .into_owned()
    }

    /// Copy `source` into the static folder as `name`.
    pub(crate) fn copy_asset(&self, source: &Path, name: &str) -> Result<(), SiteError> {
        let target = self.static_dir.join(name);
        fs::copy(source, &target).map_err(SiteError::io(source))?;
        self.count(|s| s.assets += 1);
        Ok(())
    }

    /// Write a style bundle into the static folder as `name`.
    pub(crate) fn write_bundle(&self, name: &str, content: &str) -> Result<(), SiteError> {
        let target = self.static_dir.join(name);
        fs::write(&target, content).map_err(SiteError::io(&target))?;
        self.count(|s| s.stylesheets += 1);
        Ok(())
    }

    pub(crate) fn count(&self, update: impl FnOnce(&mut BuildSummary)) {
        let mut summary = self.summary.get();
        update(&mut summary);
        self.summary.set(summary);
    }
}
