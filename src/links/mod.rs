//! Link validation for documentation pages.

mod diagnostic;
mod manifest;
mod validate;

pub use diagnostic::{Diagnostic, DiagnosticCode, DiagnosticSink};
pub use manifest::DocManifest;
pub use validate::{LinkValidator, ignore_prefixes};

use rustc_hash::FxHashMap;

use crate::core::LinkKind;
use crate::mdast::{self, Node, NodeKind};

/// Outcome of checking one document.
#[derive(Debug, Clone)]
pub struct DocumentReport {
    pub tree: Node,
    pub diagnostics: Vec<Diagnostic>,
    /// Links seen before rewriting, by kind label.
    pub link_counts: FxHashMap<&'static str, usize>,
}

/// Parse `source`, rewrite its links and collect diagnostics.
pub fn check_document<F>(source: &str, validator: &LinkValidator<'_, F>, base_path: &str) -> DocumentReport
where
    F: Fn(&str) -> bool,
{
    let tree = mdast::parse(source);
    let link_counts = count_links(&tree, base_path);
    let mut diagnostics = Vec::new();
    let tree = validator.rewrite(tree, &mut diagnostics);

    DocumentReport {
        tree,
        diagnostics,
        link_counts,
    }
}

fn count_links(tree: &Node, base_path: &str) -> FxHashMap<&'static str, usize> {
    let mut counts = FxHashMap::default();
    tree.walk(&mut |node| {
        if let NodeKind::Link { url, .. } = &node.kind {
            *counts.entry(LinkKind::parse(url, base_path).label()).or_default() += 1;
        }
    });
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_document() {
        let manifest = DocManifest::from_entries([manifest::DocumentEntry::new("/docs/a")]);
        let validator = LinkValidator::new(&manifest, "/docs", |_: &str| false);
        let report = check_document(
            "[a](/docs/a.mdx) [b](/docs/b) [c](https://example.com) [d](/docs/a)",
            &validator,
            "/docs",
        );

        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].url, "/docs/b");
        assert_eq!(report.link_counts.get("docs"), Some(&3));
        assert_eq!(report.link_counts.get("external"), Some(&1));
        assert_eq!(report.tree.count(|n| matches!(&n.kind, NodeKind::Link { url, .. } if url == "/docs/a")), 2);
    }
}
