//! Stylesheet bundling.

use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

use mdsite_markdown::tag;

use crate::SiteError;

/// Regular files of a stylesheet folder, sorted by name.
pub(crate) fn stylesheets(dir: &Path) -> Result<Vec<PathBuf>, SiteError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(SiteError::io(dir))? {
        let path = entry.map_err(SiteError::io(dir))?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Concatenate stylesheets, each preceded by a `/* <path> */` comment.
pub(crate) fn bundle(files: &[PathBuf]) -> Result<String, SiteError> {
    let mut out = String::new();
    for path in files {
        let css = fs::read_to_string(path).map_err(SiteError::io(path))?;
        let _ = writeln!(out, "/* {} */", path.display());
        out.push_str(&css);
        out.push('\n');
    }
    Ok(out)
}

/// `<link>` markup pointing at a bundle.
pub(crate) fn link_tag(href: &str) -> String {
    tag(
        "link",
        &[("rel", "stylesheet"), ("type", "text/css"), ("href", href)],
        "",
    )
}
