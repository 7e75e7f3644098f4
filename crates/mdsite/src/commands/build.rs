//! `mdsite build` command implementation.

use std::path::PathBuf;

use clap::Args;
use mdsite_config::{CliSettings, Config};
use mdsite_site::SiteBuilder;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Markdown source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Output directory for the generated site (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Write parsed node trees to <page>.log next to each page.
    #[arg(long)]
    pub(crate) debug_logs: bool,

    /// Path to configuration file (default: auto-discover mdsite.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log progress at info level.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            output_dir: self.output_dir,
            debug_logs: self.debug_logs.then_some(true),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let build = &config.build_resolved;
        tracing::debug!(config_path = ?config.config_path, "Loaded configuration");

        output.info(&format!("Source: {}", build.source_dir.display()));
        output.info(&format!("Output: {}", build.output_dir.display()));

        let summary = SiteBuilder::new(&build.source_dir, &build.output_dir)
            .with_layout(config.layout.clone())
            .with_debug_logs(build.debug_logs)
            .build()?;

        output.success(&format!(
            "Built {} pages from {} directories to {}",
            summary.pages,
            summary.directories,
            build.output_dir.display()
        ));
        Ok(())
    }
}
