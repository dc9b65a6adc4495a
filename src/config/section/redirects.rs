//! `[redirects]` section configuration.
//!
//! ```toml
//! [redirects]
//! static = "redirects/static/docs.json"      # exact-path table
//! dynamic = "redirects/dynamic/docs.jsonc"   # ordered pattern rules
//! directory = "public/directory.json"        # published URLs
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::utils::path::normalize_path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedirectsSection {
    #[serde(rename = "static")]
    pub static_rules: PathBuf,
    #[serde(rename = "dynamic")]
    pub dynamic_rules: PathBuf,
    pub directory: PathBuf,
}

impl Default for RedirectsSection {
    fn default() -> Self {
        Self {
            static_rules: "redirects/static/docs.json".into(),
            dynamic_rules: "redirects/dynamic/docs.jsonc".into(),
            directory: "public/directory.json".into(),
        }
    }
}

impl RedirectsSection {
    /// Make every path absolute relative to `root`.
    pub fn normalize(&mut self, root: &Path) {
        for path in [
            &mut self.static_rules,
            &mut self.dynamic_rules,
            &mut self.directory,
        ] {
            *path = normalize_path(&root.join(&*path));
        }
    }
}
