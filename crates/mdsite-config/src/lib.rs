//! Configuration management for mdsite.
//!
//! Parses `mdsite.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [build]
//! source_dir = "input"
//! output_dir = "output"
//! debug_logs = false
//!
//! [layout]
//! reserved_prefix = "_"
//! template_file = "_template.md"
//! styles_dir = "_styles"
//! static_dir = "_static"
//! static_output_dir = "_static"
//! placeholder = "{{content}}"
//! ```

use std::path::{Path, PathBuf};

use mdsite_site::{SiteError, SiteLayout};
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override markdown source directory.
    pub source_dir: Option<PathBuf>,
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
    /// Override debug log dumps.
    pub debug_logs: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdsite.toml";

const DEFAULT_SOURCE_DIR: &str = "input";
const DEFAULT_OUTPUT_DIR: &str = "output";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build configuration (paths are relative strings from TOML).
    build: BuildConfigRaw,
    /// Reserved names inside source directories.
    pub layout: SiteLayout,

    /// Resolved build configuration (set after loading).
    #[serde(skip)]
    pub build_resolved: BuildConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw build configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct BuildConfigRaw {
    source_dir: Option<String>,
    output_dir: Option<String>,
    debug_logs: Option<bool>,
}

/// Resolved build configuration with paths joined to the config directory.
#[derive(Debug, Default)]
pub struct BuildConfig {
    /// Source directory for markdown files.
    pub source_dir: PathBuf,
    /// Output directory, replaced on every build.
    pub output_dir: PathBuf,
    /// Whether to dump parsed node trees next to the pages.
    pub debug_logs: bool,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mdsite.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values. The final result
    /// is validated.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.build_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.build_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(debug_logs) = settings.debug_logs {
            self.build_resolved.debug_logs = debug_logs;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::discover_from(&current)
    }

    fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            build: BuildConfigRaw::default(),
            layout: SiteLayout::default(),
            build_resolved: BuildConfig {
                source_dir: base.join(DEFAULT_SOURCE_DIR),
                output_dir: base.join(DEFAULT_OUTPUT_DIR),
                debug_logs: false,
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically at the end of [`Config::load`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_build()?;
        self.validate_layout()?;
        Ok(())
    }

    /// Source and output must be disjoint: the output directory is wiped
    /// before the source is read.
    fn validate_build(&self) -> Result<(), ConfigError> {
        let source = absolute(&self.build_resolved.source_dir)?;
        let output = absolute(&self.build_resolved.output_dir)?;
        if source.starts_with(&output) || output.starts_with(&source) {
            return Err(ConfigError::Validation(format!(
                "build.source_dir ({}) and build.output_dir ({}) must not contain each other",
                source.display(),
                output.display()
            )));
        }
        Ok(())
    }

    /// Layout rules live on [`SiteLayout`]; messages gain the `layout.` table name.
    fn validate_layout(&self) -> Result<(), ConfigError> {
        self.layout.validate().map_err(|err| match err {
            SiteError::InvalidLayout(msg) => ConfigError::Validation(format!("layout.{msg}")),
            other => ConfigError::Validation(other.to_string()),
        })
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));
        self.build_resolved = BuildConfig {
            source_dir: resolve(self.build.source_dir.as_deref(), DEFAULT_SOURCE_DIR),
            output_dir: resolve(self.build.output_dir.as_deref(), DEFAULT_OUTPUT_DIR),
            debug_logs: self.build.debug_logs.unwrap_or(false),
        };
    }
}

fn absolute(path: &Path) -> Result<PathBuf, ConfigError> {
    Ok(std::path::absolute(path)?)
}
