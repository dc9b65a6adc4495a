//! Redirect rules and chain tracing.
//!
//! - [`RuleSet`]: static table plus ordered dynamic rules
//! - [`Directory`]: URLs the site actually publishes
//! - [`Resolver`]: follows hops, detects loops, checks the final destination

mod directory;
mod jsonc;
mod matcher;
mod pattern;
mod rule;
mod trace;

use std::path::Path;

pub use directory::Directory;
#[cfg(test)]
pub use rule::RedirectRule;
pub use rule::RuleSet;
pub use trace::{RedirectStep, Resolver, TraceResult};

use crate::core::LoadError;

/// Everything a trace needs, loaded up front.
#[derive(Debug, Clone, Default)]
pub struct RedirectData {
    pub rules: RuleSet,
    pub directory: Directory,
}

impl RedirectData {
    /// Load rule files and the directory concurrently. Any failure is fatal.
    pub fn load(
        static_path: &Path,
        dynamic_path: &Path,
        directory_path: &Path,
        base_path: &str,
    ) -> Result<Self, LoadError> {
        let (rules, directory) = rayon::join(
            || RuleSet::load(static_path, dynamic_path),
            || Directory::load(directory_path, base_path),
        );
        Ok(Self {
            rules: rules?,
            directory: directory?,
        })
    }

    /// Resolver over this data.
    #[inline]
    pub fn resolver<'a>(&'a self, base_path: &'a str) -> Resolver<'a> {
        Resolver::new(&self.rules, &self.directory, base_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_and_trace() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join("static.json"),
            r#"{"/docs/a": {"source": "/docs/a", "destination": "/docs/b", "permanent": true}}"#,
        )
        .unwrap();
        fs::write(
            root.join("dynamic.jsonc"),
            r#"[
                // moved section
                {"source": "/docs/old/:path*", "destination": "/docs/a", "permanent": false},
            ]"#,
        )
        .unwrap();
        fs::write(root.join("directory.json"), r#"[{"path": "b.mdx", "url": "/docs/b"}]"#).unwrap();

        let data = RedirectData::load(
            &root.join("static.json"),
            &root.join("dynamic.jsonc"),
            &root.join("directory.json"),
            "/docs",
        )
        .unwrap();
        let result = data.resolver("/docs").trace("/old/x");

        assert_eq!(result.input_url, "/docs/old/x");
        assert_eq!(result.steps.len(), 2);
        assert!(!result.steps[0].permanent);
        assert!(result.steps[1].permanent);
        assert_eq!(result.final_destination, "/docs/b");
        assert!(result.is_clean());
    }

    #[test]
    fn test_missing_input_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("static.json"), "{}").unwrap();
        fs::write(root.join("dynamic.jsonc"), "[]").unwrap();

        let err = RedirectData::load(
            &root.join("static.json"),
            &root.join("dynamic.jsonc"),
            &root.join("directory.json"),
            "/docs",
        )
        .unwrap_err();
        assert_eq!(err.path(), root.join("directory.json"));
    }
}
