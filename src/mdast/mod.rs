//! Markdown syntax tree.
//!
//! A small mdast-shaped tree: every node has a [`NodeKind`] carrying its own
//! data, a list of children and an optional source [`Position`]. Serialized
//! with a `type` tag so emitted trees read like mdast JSON.

mod parse;
mod position;

pub use parse::parse;
#[cfg(test)]
pub use position::Point;
pub use position::Position;

use serde::Serialize;

/// Node-specific data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NodeKind {
    Root,
    Paragraph,
    Heading {
        depth: u8,
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },
    Text {
        value: String,
    },
    InlineCode {
        value: String,
    },
    Code {
        #[serde(skip_serializing_if = "Option::is_none")]
        lang: Option<String>,
        value: String,
    },
    Emphasis,
    Strong,
    Delete,
    Link {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    Image {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        alt: String,
    },
    List {
        ordered: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        start: Option<u64>,
    },
    ListItem {
        #[serde(skip_serializing_if = "Option::is_none")]
        checked: Option<bool>,
    },
    Blockquote,
    Table,
    TableRow,
    TableCell,
    /// Raw HTML or JSX, kept opaque.
    Html {
        value: String,
    },
    Break,
    ThematicBreak,
    FootnoteReference {
        identifier: String,
    },
    FootnoteDefinition {
        identifier: String,
    },
    Math {
        value: String,
    },
    InlineMath {
        value: String,
    },
    /// Frontmatter block.
    Yaml {
        value: String,
    },
    /// Platform-aware link produced by the link rewriter.
    ///
    /// `href` contains the `:sdk:` placeholder segment.
    #[serde(rename = "sdkLink")]
    SdkLink {
        href: String,
        sdks: Vec<String>,
        code: bool,
    },
    /// Constructs without a dedicated variant (definition lists, super/subscript).
    Other {
        name: String,
    },
}

impl NodeKind {
    /// Literal text slot for nodes whose content arrives as text events.
    pub(crate) fn literal_mut(&mut self) -> Option<&mut String> {
        match self {
            Self::Text { value }
            | Self::Code { value, .. }
            | Self::Html { value }
            | Self::Yaml { value } => Some(value),
            Self::Image { alt, .. } => Some(alt),
            _ => None,
        }
    }
}

/// One syntax tree node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
            position: None,
        }
    }

    pub fn with_children(kind: NodeKind, children: Vec<Node>) -> Self {
        Self {
            kind,
            children,
            position: None,
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::new(NodeKind::Text {
            value: value.into(),
        })
    }

    #[cfg(test)]
    pub fn link(url: impl Into<String>, children: Vec<Node>) -> Self {
        Self::with_children(
            NodeKind::Link {
                url: url.into(),
                title: None,
            },
            children,
        )
    }

    pub fn root(children: Vec<Node>) -> Self {
        Self::with_children(NodeKind::Root, children)
    }

    #[inline]
    pub fn at(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Concatenated text content of this subtree.
    #[cfg(test)]
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    #[cfg(test)]
    fn collect_text(&self, out: &mut String) {
        match &self.kind {
            NodeKind::Text { value } | NodeKind::InlineCode { value } => out.push_str(value),
            _ => self.children.iter().for_each(|child| child.collect_text(out)),
        }
    }

    /// Depth-first pre-order walk.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Count nodes matching `pred`.
    pub fn count(&self, pred: impl Fn(&Node) -> bool) -> usize {
        let mut n = 0;
        self.walk(&mut |node| {
            if pred(node) {
                n += 1;
            }
        });
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_type_tag() {
        let tree = Node::root(vec![Node::link("/docs/a", vec![Node::text("A")])]);
        let json = serde_json::to_value(&tree).unwrap();

        assert_eq!(json["type"], "root");
        assert_eq!(json["children"][0]["type"], "link");
        assert_eq!(json["children"][0]["url"], "/docs/a");
        assert_eq!(json["children"][0]["children"][0]["value"], "A");
        assert!(json["children"][0].get("title").is_none());
    }

    #[test]
    fn test_serialize_sdk_link() {
        let node = Node::with_children(
            NodeKind::SdkLink {
                href: "/docs/:sdk:/a".into(),
                sdks: vec!["react".into()],
                code: false,
            },
            vec![Node::text("A")],
        );
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "sdkLink");
        assert_eq!(json["sdks"][0], "react");
    }

    #[test]
    fn test_plain_text_and_count() {
        let tree = Node::root(vec![Node::with_children(
            NodeKind::Paragraph,
            vec![
                Node::text("see "),
                Node::link("/docs/a", vec![Node::new(NodeKind::InlineCode { value: "a()".into() })]),
            ],
        )]);
        assert_eq!(tree.to_plain_text(), "see a()");
        assert_eq!(tree.count(|n| matches!(n.kind, NodeKind::Link { .. })), 1);
    }
}
