//! Link classification for documentation content.

use crate::utils::path::route::{is_external_link, is_under_base, split_path_fragment};

/// File extensions stripped from internal doc links (`/docs/a.mdx` -> `/docs/a`).
const DOC_EXTENSIONS: [&str; 2] = [".mdx", ".md"];

/// Syntactic classification of a link relative to the docs base path.
///
/// Only docs links keep their text; the other kinds are counted, not followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind<'a> {
    /// Link with a URL scheme (https://, mailto:, ...).
    External,
    /// Pure fragment link (`#section`).
    Fragment,
    /// Link to a page under the docs base path.
    Docs(&'a str),
    /// Site-root path outside the docs (`/pricing`).
    SiteRoot,
    /// File-relative path (`./setup`, `../other`).
    FileRelative,
}

impl<'a> LinkKind<'a> {
    /// Classify `link` for a site whose docs live under `base_path`.
    pub fn parse(link: &'a str, base_path: &str) -> Self {
        if is_external_link(link) {
            Self::External
        } else if link.starts_with('#') {
            Self::Fragment
        } else if is_under_base(link, base_path) {
            Self::Docs(link)
        } else if link.starts_with('/') {
            Self::SiteRoot
        } else {
            Self::FileRelative
        }
    }

    /// Short label for reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::External => "external",
            Self::Fragment => "fragment",
            Self::Docs(_) => "docs",
            Self::SiteRoot => "site",
            Self::FileRelative => "relative",
        }
    }
}

/// Normalized target of an internal docs link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocTarget {
    /// Page path with any `.mdx`/`.md` extension removed.
    pub path: String,
    /// Anchor without `#`, if one was given.
    pub fragment: Option<String>,
}

impl DocTarget {
    /// Split a docs link into its page path and fragment.
    pub fn parse(link: &str) -> Self {
        let (path, fragment) = split_path_fragment(link);
        let path = DOC_EXTENSIONS
            .iter()
            .find_map(|ext| path.strip_suffix(ext))
            .unwrap_or(path);

        Self {
            path: path.to_string(),
            fragment: (!fragment.is_empty()).then(|| fragment.to_string()),
        }
    }

    /// Rebuild the link (`path#fragment`).
    pub fn to_url(&self) -> String {
        match &self.fragment {
            Some(fragment) => format!("{}#{}", self.path, fragment),
            None => self.path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kinds() {
        assert_eq!(
            LinkKind::parse("https://example.com", "/docs"),
            LinkKind::External
        );
        assert_eq!(LinkKind::parse("mailto:team@example.com", "/docs"), LinkKind::External);
        assert_eq!(LinkKind::parse("#setup", "/docs"), LinkKind::Fragment);
        assert_eq!(
            LinkKind::parse("/docs/quickstart", "/docs"),
            LinkKind::Docs("/docs/quickstart")
        );
        assert_eq!(LinkKind::parse("/docs", "/docs"), LinkKind::Docs("/docs"));
        assert_eq!(LinkKind::parse("/pricing", "/docs"), LinkKind::SiteRoot);
        assert_eq!(LinkKind::parse("/docsearch", "/docs"), LinkKind::SiteRoot);
        assert_eq!(LinkKind::parse("./sibling", "/docs"), LinkKind::FileRelative);
    }

    #[test]
    fn test_doc_target_strips_extension() {
        let target = DocTarget::parse("/docs/guides/setup.mdx");
        assert_eq!(target.path, "/docs/guides/setup");
        assert_eq!(target.fragment, None);

        let target = DocTarget::parse("/docs/guides/setup.md");
        assert_eq!(target.path, "/docs/guides/setup");
    }

    #[test]
    fn test_doc_target_extension_before_fragment() {
        let target = DocTarget::parse("/docs/guides/setup.mdx#install");
        assert_eq!(target.path, "/docs/guides/setup");
        assert_eq!(target.fragment.as_deref(), Some("install"));
        assert_eq!(target.to_url(), "/docs/guides/setup#install");
    }

    #[test]
    fn test_doc_target_empty_fragment() {
        let target = DocTarget::parse("/docs/a#");
        assert_eq!(target.fragment, None);
        assert_eq!(target.to_url(), "/docs/a");
    }
}
