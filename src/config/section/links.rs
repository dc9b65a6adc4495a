//! `[links]` section configuration.
//!
//! ```toml
//! [links]
//! manifest = "dist/manifest.json"   # published pages with anchors and SDK scope
//! content = "docs"                  # default input for `docroute links`
//! extensions = ["mdx", "md"]        # files collected from directories
//! ignore = ["/docs/reference/api"]  # page path prefixes left untouched
//! fragments = true                  # report unknown anchors
//! level = "error"                   # failure level: error | warn
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::utils::path::normalize_path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinksSection {
    pub manifest: PathBuf,
    pub content: PathBuf,
    pub extensions: Vec<String>,
    pub ignore: Vec<String>,
    pub fragments: bool,
    pub level: LinkLevel,
}

impl Default for LinksSection {
    fn default() -> Self {
        Self {
            manifest: "dist/manifest.json".into(),
            content: "docs".into(),
            extensions: vec!["mdx".into(), "md".into()],
            ignore: Vec::new(),
            fragments: true,
            level: LinkLevel::default(),
        }
    }
}

/// How broken links affect the exit status.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LinkLevel {
    /// Broken links fail the command.
    Error,
    /// Broken links are reported only.
    #[default]
    Warn,
}

impl LinksSection {
    pub const EXTENSIONS: FieldPath = FieldPath::field("links", "extensions");
    pub const IGNORE: FieldPath = FieldPath::field("links", "ignore");

    pub fn normalize(&mut self, root: &Path) {
        self.manifest = normalize_path(&root.join(&self.manifest));
        self.content = normalize_path(&root.join(&self.content));
        for ext in &mut self.extensions {
            if let Some(stripped) = ext.strip_prefix('.') {
                *ext = stripped.to_string();
            }
        }
    }

    /// Check if `path` has one of the configured extensions.
    pub fn is_document(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.trim_start_matches('.') == ext))
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.extensions.is_empty() {
            diag.error_with_hint(
                Self::EXTENSIONS,
                "at least one extension is required",
                "use [\"mdx\", \"md\"]",
            );
        }
        if self.extensions.iter().any(|ext| ext.starts_with('.')) {
            diag.warn(Self::EXTENSIONS, "leading `.` in extensions is ignored");
        }
        for prefix in &self.ignore {
            if !prefix.starts_with('/') {
                diag.warn(
                    Self::IGNORE,
                    format!("`{prefix}` is not a site path and will never match"),
                );
            }
        }
    }
}
