//! Project configuration for `docroute.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [site], [redirects], [links]
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! ├── util.rs        # find_config_file
//! └── mod.rs         # Config (this file)
//! ```
//!
//! A missing config file is not an error: every field has a default and the
//! current directory becomes the project root.

pub mod section;
pub mod types;
mod util;

pub use section::{LinkLevel, LinksSection, RedirectsSection, SiteSection};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};
use util::find_config_file;

use crate::cli::{Cli, Commands, LinksArgs, TraceArgs};
use crate::{debug, log};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing docroute.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Absolute path to the config file, empty when none was found
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file or cwd
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub site: SiteSection,

    #[serde(default)]
    pub redirects: RedirectsSection,

    #[serde(default)]
    pub links: LinksSection,
}

impl Config {
    /// Load configuration for a CLI invocation.
    ///
    /// Searches upward from cwd for the config file, applies CLI overrides,
    /// resolves paths against the project root and validates the result.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config, &cwd) {
            Some(path) => {
                debug!("config"; "using {}", path.display());
                let mut config = Self::from_path(&path)?;
                config.config_path = path;
                config
            }
            None => {
                debug!("config"; "no {} found, using defaults", cli.config.display());
                Self::default()
            }
        };

        let root = config
            .config_path
            .parent()
            .map_or_else(|| cwd.clone(), Path::to_path_buf);
        config.finalize(&root);
        config.apply_command_options(cli, &cwd);
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .map_err(|err| ConfigError::Toml(path.to_path_buf(), err))?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), toml::de::Error> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {} are ignored: {}", display_path, fields.join(", "));
    }

    /// Path relative to the project root, for display.
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    /// Base path shared by both commands.
    #[inline]
    pub fn base_path(&self) -> &str {
        &self.site.base_path
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Resolve config paths against the project root.
    fn finalize(&mut self, root: &Path) {
        self.root = crate::utils::path::normalize_path(root);
        if !self.config_path.as_os_str().is_empty() {
            self.config_path = crate::utils::path::normalize_path(&self.config_path);
        }
        let root = self.root.clone();
        self.redirects.normalize(&root);
        self.links.normalize(&root);
    }

    /// Apply CLI overrides. Paths given on the command line are relative to cwd.
    fn apply_command_options(&mut self, cli: &Cli, cwd: &Path) {
        Self::update_option(&mut self.site.base_path, cli.base_path.as_ref());

        match &cli.command {
            Commands::Trace { args } => self.apply_trace_args(args, cwd),
            Commands::Links { args } => self.apply_links_args(args, cwd),
        }
    }

    fn apply_trace_args(&mut self, args: &TraceArgs, cwd: &Path) {
        let redirects = &mut self.redirects;
        Self::update_path(&mut redirects.static_rules, args.static_rules.as_deref(), cwd);
        Self::update_path(&mut redirects.dynamic_rules, args.dynamic_rules.as_deref(), cwd);
        Self::update_path(&mut redirects.directory, args.directory.as_deref(), cwd);
    }

    fn apply_links_args(&mut self, args: &LinksArgs, cwd: &Path) {
        Self::update_path(&mut self.links.manifest, args.manifest.as_deref(), cwd);
        Self::update_option(&mut self.links.fragments, args.fragments.as_ref());

        // --warn-only downgrades the failure level
        if args.warn_only {
            self.links.level = LinkLevel::Warn;
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    fn update_path(config_path: &mut PathBuf, cli_path: Option<&Path>, cwd: &Path) {
        if let Some(path) = cli_path {
            *config_path = crate::utils::path::normalize_path(&cwd.join(path));
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate the configuration, reporting every problem at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        self.site.validate(&mut diag);
        self.links.validate(&mut diag);

        diag.print_warnings();
        diag.into_result().map_err(ConfigError::Diagnostics)
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

/// Parse config text. Panics on unknown fields to catch typos in tests.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> Config {
    let (parsed, ignored) = Config::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
