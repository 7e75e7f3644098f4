//! Per-directory asset table: discovered files and their resolved names.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use crate::SiteError;

/// Assets of one directory's asset folder.
///
/// Keys are paths relative to the asset folder using `/` separators, the
/// form used by `asset://` references.
#[derive(Debug, Default)]
pub(crate) struct AssetTable {
    /// Discovered but not yet copied.
    unused: BTreeMap<String, PathBuf>,
    /// Relative path to renamed file name in the static output folder.
    resolved: HashMap<String, String>,
}

impl AssetTable {
    /// Scan `dir` recursively. A missing folder yields an empty table.
    pub(crate) fn scan(dir: &Path) -> Result<Self, SiteError> {
        let mut table = Self::default();
        if dir.is_dir() {
            walk(dir, "", &mut table.unused)?;
        }
        Ok(table)
    }

    /// Discovered relative paths and source files, in sorted order.
    pub(crate) fn discovered(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.unused
            .iter()
            .map(|(rel, path)| (rel.as_str(), path.as_path()))
    }

    /// Remove `path` from the not-yet-copied set, returning its source file.
    pub(crate) fn take_unused(&mut self, path: &str) -> Option<PathBuf> {
        self.unused.remove(path)
    }

    pub(crate) fn resolved(&self, path: &str) -> Option<&str> {
        self.resolved.get(path).map(String::as_str)
    }

    pub(crate) fn record(&mut self, path: &str, name: String) {
        self.resolved.insert(path.to_owned(), name);
    }
}

fn walk(dir: &Path, prefix: &str, found: &mut BTreeMap<String, PathBuf>) -> Result<(), SiteError> {
    let mut entries = fs::read_dir(dir)
        .map_err(SiteError::io(dir))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(SiteError::io(dir))?;
    entries.sort_by_key(fs::DirEntry::file_name);

    for entry in entries {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        let relative = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}/{name}")
        };
        if path.is_dir() {
            walk(&path, &relative, found)?;
        } else {
            found.insert(relative, path);
        }
    }
    Ok(())
}

/// Output file name for an asset: `<stem>-<id><.ext>`.
///
/// Only the final path component is kept; the identifier keeps names from
/// different folders apart.
pub(crate) fn renamed(path: &str, id: &str) -> String {
    let path = Path::new(path);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    match path.extension() {
        Some(ext) => format!("{stem}-{id}.{}", ext.to_string_lossy()),
        None => format!("{stem}-{id}"),
    }
}
