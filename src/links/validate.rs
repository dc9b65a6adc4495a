//! Link checking and rewriting over a syntax tree.
//!
//! For each link under the docs base path:
//!
//! 1. strip `.mdx`/`.md` and split off the fragment
//! 2. skip it if the ignore predicate matches
//! 3. look the page up in the [`DocManifest`] and check the anchor
//! 4. turn links to SDK-scoped pages into `sdkLink` nodes, otherwise store
//!    the stripped URL
//!
//! Broken targets are reported, never fatal. Rewriting an already rewritten
//! tree changes nothing.

use super::diagnostic::{Diagnostic, DiagnosticCode, DiagnosticSink};
use super::manifest::DocManifest;
use crate::core::{DocTarget, LinkKind};
use crate::mdast::{Node, NodeKind, Position};

/// Placeholder segment replaced with the reader's SDK at render time.
pub const SDK_PLACEHOLDER: &str = ":sdk:";

/// Rewrites links against a read-only manifest.
pub struct LinkValidator<'a, F> {
    manifest: &'a DocManifest,
    base_path: &'a str,
    ignore: F,
    check_fragments: bool,
}

impl<'a, F> LinkValidator<'a, F>
where
    F: Fn(&str) -> bool,
{
    /// `ignore` gets the page path (extension stripped, no fragment).
    pub fn new(manifest: &'a DocManifest, base_path: &'a str, ignore: F) -> Self {
        Self {
            manifest,
            base_path,
            ignore,
            check_fragments: true,
        }
    }

    /// Disable `link-hash-not-found` reports.
    pub fn check_fragments(mut self, enabled: bool) -> Self {
        self.check_fragments = enabled;
        self
    }

    /// Rewrite every link in `tree`, reporting broken targets to `sink`.
    pub fn rewrite(&self, tree: Node, sink: &mut impl DiagnosticSink) -> Node {
        let Node {
            kind,
            children,
            position,
        } = tree;
        let children = children
            .into_iter()
            .map(|child| self.rewrite(child, sink))
            .collect();
        let node = Node {
            kind,
            children,
            position,
        };

        let target = match &node.kind {
            NodeKind::Link { url, .. } => match LinkKind::parse(url, self.base_path) {
                LinkKind::Docs(link) => Some(DocTarget::parse(link)),
                _ => None,
            },
            _ => None,
        };
        match target {
            Some(target) => self.rewrite_link(node, target, sink),
            None => node,
        }
    }

    fn rewrite_link(&self, mut node: Node, target: DocTarget, sink: &mut impl DiagnosticSink) -> Node {
        if (self.ignore)(&target.path) {
            return node;
        }

        let Some(doc) = self.manifest.get(&target.path) else {
            sink.report(diagnostic(DiagnosticCode::DocNotFound, &target, node.position));
            return node;
        };

        if self.check_fragments
            && let Some(fragment) = &target.fragment
            && !doc.has_heading(fragment)
        {
            sink.report(diagnostic(DiagnosticCode::HashNotFound, &target, node.position));
        }

        match &doc.sdk {
            Some(sdks) => self.scope_to_sdk(node, &target, sdks),
            None => {
                if let NodeKind::Link { url, .. } = &mut node.kind {
                    *url = target.to_url();
                }
                node
            }
        }
    }

    /// Replace a link with an `sdkLink` carrying the scoped URL template.
    ///
    /// A sole inline-code child moves its formatting onto the new node.
    fn scope_to_sdk(&self, node: Node, target: &DocTarget, sdks: &[String]) -> Node {
        let Node {
            mut children,
            position,
            ..
        } = node;

        let code = matches!(children.as_slice(), [only] if matches!(only.kind, NodeKind::InlineCode { .. }));
        if code {
            for child in &mut children {
                if let NodeKind::InlineCode { value } = &mut child.kind {
                    child.kind = NodeKind::Text {
                        value: std::mem::take(value),
                    };
                }
            }
        }

        Node {
            kind: NodeKind::SdkLink {
                href: scoped_href(&target.to_url(), self.base_path),
                sdks: sdks.to_vec(),
                code,
            },
            children,
            position,
        }
    }
}

/// Insert the SDK placeholder right after the base path.
///
/// `/docs/guides/x#y` -> `/docs/:sdk:/guides/x#y`
pub fn scoped_href(url: &str, base_path: &str) -> String {
    let rest = url.strip_prefix(base_path).unwrap_or(url);
    let rest = rest.strip_prefix('/').unwrap_or(rest);
    if rest.is_empty() {
        format!("{base_path}/{SDK_PLACEHOLDER}")
    } else if rest.starts_with('#') {
        format!("{base_path}/{SDK_PLACEHOLDER}{rest}")
    } else {
        format!("{base_path}/{SDK_PLACEHOLDER}/{rest}")
    }
}

/// Predicate matching page paths that start with any of `prefixes`.
pub fn ignore_prefixes(prefixes: Vec<String>) -> impl Fn(&str) -> bool {
    move |url| prefixes.iter().any(|prefix| url.starts_with(prefix.as_str()))
}

fn diagnostic(code: DiagnosticCode, target: &DocTarget, position: Option<Position>) -> Diagnostic {
    Diagnostic {
        code,
        url: target.path.clone(),
        fragment: target.fragment.clone(),
        position,
    }
}
