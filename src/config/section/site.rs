//! `[site]` section configuration.
//!
//! ```toml
//! [site]
//! base_path = "/docs"    # URL prefix of every documentation page
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    pub base_path: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            base_path: "/docs".into(),
        }
    }
}

impl SiteSection {
    pub const BASE_PATH: FieldPath = FieldPath::field("site", "base_path");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let base = &self.base_path;
        if !base.starts_with('/') {
            diag.error_with_hint(
                Self::BASE_PATH,
                format!("`{base}` must start with `/`"),
                format!("use \"/{}\"", base.trim_matches('/')),
            );
        } else if base.len() > 1 && base.ends_with('/') {
            diag.error_with_hint(
                Self::BASE_PATH,
                format!("`{base}` must not end with `/`"),
                format!("use \"{}\"", base.trim_end_matches('/')),
            );
        } else if base == "/" {
            diag.error(Self::BASE_PATH, "base path cannot be the site root");
        }
    }
}
