//! Reserved names that shape a source directory.

use serde::Deserialize;

use crate::SiteError;

/// Names of the reserved entries in every source directory.
///
/// Entries whose name starts with `reserved_prefix` are never converted as
/// pages, so every other reserved name must carry that prefix. Deserializes
/// from a `[layout]` table; missing fields keep their defaults.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SiteLayout {
    pub reserved_prefix: String,
    /// Per-directory page template (markdown).
    pub template_file: String,
    /// Per-directory stylesheet folder, bundled into one file.
    pub styles_dir: String,
    /// Per-directory asset folder.
    pub static_dir: String,
    /// Shared folder under the output root collecting bundles and assets.
    pub static_output_dir: String,
    /// Marker replaced by page content inside templates.
    pub placeholder: String,
}

impl Default for SiteLayout {
    fn default() -> Self {
        Self {
            reserved_prefix: "_".to_owned(),
            template_file: "_template.md".to_owned(),
            styles_dir: "_styles".to_owned(),
            static_dir: "_static".to_owned(),
            static_output_dir: "_static".to_owned(),
            placeholder: "{{content}}".to_owned(),
        }
    }
}

impl SiteLayout {
    /// Check that the layout can be used for a build.
    ///
    /// Messages in [`SiteError::InvalidLayout`] start with the offending
    /// field name.
    ///
    /// # Errors
    ///
    /// Returns `SiteError::InvalidLayout` for the first rule that fails.
    pub fn validate(&self) -> Result<(), SiteError> {
        if self.placeholder.is_empty() {
            return Err(SiteError::InvalidLayout(
                "placeholder cannot be empty".to_owned(),
            ));
        }
        if self.reserved_prefix.is_empty() {
            return Err(SiteError::InvalidLayout(
                "reserved_prefix cannot be empty".to_owned(),
            ));
        }
        for (field, name) in [
            ("template_file", &self.template_file),
            ("styles_dir", &self.styles_dir),
            ("static_dir", &self.static_dir),
        ] {
            if !name.starts_with(&self.reserved_prefix) {
                return Err(SiteError::InvalidLayout(format!(
                    "{field} \"{name}\" must start with reserved prefix \"{}\"",
                    self.reserved_prefix
                )));
            }
        }
        let segment = &self.static_output_dir;
        if segment.is_empty() || segment.contains(['/', '\\']) || segment == "." || segment == ".." {
            return Err(SiteError::InvalidLayout(format!(
                "static_output_dir \"{segment}\" must be a single path segment"
            )));
        }
        Ok(())
    }

    /// Whether a directory entry is reserved and skipped during conversion.
    #[must_use]
    pub fn is_reserved(&self, name: &str) -> bool {
        name.starts_with(&self.reserved_prefix)
    }

    /// Public URL of a file placed in the shared static output folder.
    #[must_use]
    pub fn static_url(&self, file_name: &str) -> String {
        format!("/{}/{file_name}", self.static_output_dir)
    }
}
