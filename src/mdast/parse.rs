//! Markdown/MDX to [`Node`] conversion using pulldown-cmark.

use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};

use super::position::LineIndex;
use super::{Node, NodeKind};

/// Parser extensions to enable.
#[derive(Debug, Clone, Default)]
pub struct MarkdownOptions {
    pub tables: bool,
    pub footnotes: bool,
    pub strikethrough: bool,
    pub task_lists: bool,
    /// `# Heading {#custom-id}`
    pub heading_attributes: bool,
    /// Leading `---` frontmatter block
    pub frontmatter: bool,
    pub math: bool,
}

impl MarkdownOptions {
    /// Everything a documentation page may use.
    pub fn all() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            task_lists: true,
            heading_attributes: true,
            frontmatter: true,
            math: true,
        }
    }

    fn to_pulldown_options(&self) -> Options {
        let mut opts = Options::empty();
        let flags = [
            (self.tables, Options::ENABLE_TABLES),
            (self.footnotes, Options::ENABLE_FOOTNOTES),
            (self.strikethrough, Options::ENABLE_STRIKETHROUGH),
            (self.task_lists, Options::ENABLE_TASKLISTS),
            (self.heading_attributes, Options::ENABLE_HEADING_ATTRIBUTES),
            (self.frontmatter, Options::ENABLE_YAML_STYLE_METADATA_BLOCKS),
            (self.math, Options::ENABLE_MATH),
        ];
        for (enabled, flag) in flags {
            if enabled {
                opts.insert(flag);
            }
        }
        opts
    }
}

/// Parse a document with every extension enabled.
pub fn parse(source: &str) -> Node {
    parse_with(source, &MarkdownOptions::all())
}

/// Parse a document into a `root` node.
pub fn parse_with(source: &str, options: &MarkdownOptions) -> Node {
    TreeBuilder::new(source).build(source, options)
}

/// Stack frame for an open container node.
struct StackFrame {
    node: Node,
}

struct TreeBuilder<'a> {
    index: LineIndex<'a>,
    stack: Vec<StackFrame>,
    root_children: Vec<Node>,
}

impl<'a> TreeBuilder<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            index: LineIndex::new(source),
            stack: Vec::new(),
            root_children: Vec::new(),
        }
    }

    fn build(mut self, source: &str, options: &MarkdownOptions) -> Node {
        let parser = Parser::new_ext(source, options.to_pulldown_options());
        for (event, range) in parser.into_offset_iter() {
            self.handle_event(event, range);
        }

        // Close anything left open
        while let Some(frame) = self.stack.pop() {
            self.add_node(frame.node);
        }

        Node::root(self.root_children).at(self.index.position(0..source.len()))
    }

    fn handle_event(&mut self, event: Event, range: Range<usize>) {
        match event {
            Event::Start(tag) => self.start_tag(tag, range),
            Event::End(_) => self.end_tag(),
            Event::Text(text) => self.add_text(&text, range),
            Event::Code(code) => self.add_leaf(NodeKind::InlineCode { value: code.to_string() }, range),
            Event::Html(html) => self.add_html(&html, range),
            Event::InlineHtml(html) => self.add_leaf(NodeKind::Html { value: html.to_string() }, range),
            Event::SoftBreak => self.add_text("\n", range),
            Event::HardBreak => self.add_leaf(NodeKind::Break, range),
            Event::Rule => self.add_leaf(NodeKind::ThematicBreak, range),
            Event::FootnoteReference(label) => self.add_leaf(
                NodeKind::FootnoteReference {
                    identifier: label.to_string(),
                },
                range,
            ),
            Event::TaskListMarker(checked) => self.mark_task(checked),
            Event::InlineMath(math) => self.add_leaf(NodeKind::InlineMath { value: math.to_string() }, range),
            Event::DisplayMath(math) => self.add_leaf(NodeKind::Math { value: math.to_string() }, range),
        }
    }

    fn start_tag(&mut self, tag: Tag, range: Range<usize>) {
        let node = Node::new(tag_to_kind(tag)).at(self.index.position(range));
        self.stack.push(StackFrame { node });
    }

    fn end_tag(&mut self) {
        if let Some(frame) = self.stack.pop() {
            self.add_node(frame.node);
        }
    }

    /// Text goes into the literal of an open code/html/image node, otherwise
    /// becomes a text node merged with an adjacent one.
    fn add_text(&mut self, text: &str, range: Range<usize>) {
        if text.is_empty() {
            return;
        }
        if let Some(literal) = self.open_literal() {
            literal.push_str(text);
            return;
        }

        let end = self.index.point(range.end);
        let children = self.children_mut();
        if let Some(Node {
            kind: NodeKind::Text { value },
            position,
            ..
        }) = children.last_mut()
        {
            value.push_str(text);
            if let Some(position) = position {
                position.end = end;
            }
            return;
        }

        let node = Node::text(text).at(self.index.position(range));
        self.add_node(node);
    }

    fn add_html(&mut self, html: &str, range: Range<usize>) {
        match self.open_literal() {
            Some(literal) => literal.push_str(html),
            None => self.add_leaf(NodeKind::Html { value: html.to_string() }, range),
        }
    }

    fn add_leaf(&mut self, kind: NodeKind, range: Range<usize>) {
        // Inline code inside image alt text contributes its value only
        if let (NodeKind::InlineCode { value }, Some(literal)) = (&kind, self.open_literal()) {
            literal.push_str(value);
            return;
        }
        let node = Node::new(kind).at(self.index.position(range));
        self.add_node(node);
    }

    fn mark_task(&mut self, checked: bool) {
        let item = self
            .stack
            .iter_mut()
            .rev()
            .find_map(|frame| match &mut frame.node.kind {
                NodeKind::ListItem { checked } => Some(checked),
                _ => None,
            });
        if let Some(slot) = item {
            *slot = Some(checked);
        }
    }

    fn open_literal(&mut self) -> Option<&mut String> {
        self.stack.last_mut()?.node.kind.literal_mut()
    }

    fn children_mut(&mut self) -> &mut Vec<Node> {
        match self.stack.last_mut() {
            Some(frame) => &mut frame.node.children,
            None => &mut self.root_children,
        }
    }

    fn add_node(&mut self, node: Node) {
        self.children_mut().push(node);
    }
}

fn tag_to_kind(tag: Tag) -> NodeKind {
    match tag {
        Tag::Paragraph => NodeKind::Paragraph,
        Tag::Heading { level, id, .. } => NodeKind::Heading {
            depth: level as u8,
            id: id.map(|id| id.to_string()),
        },
        Tag::BlockQuote(_) => NodeKind::Blockquote,
        Tag::CodeBlock(kind) => {
            let lang = match kind {
                CodeBlockKind::Indented => None,
                CodeBlockKind::Fenced(info) => info.split_whitespace().next().map(str::to_string),
            };
            NodeKind::Code {
                lang,
                value: String::new(),
            }
        }
        Tag::HtmlBlock => NodeKind::Html {
            value: String::new(),
        },
        Tag::List(start) => NodeKind::List {
            ordered: start.is_some(),
            start,
        },
        Tag::Item => NodeKind::ListItem { checked: None },
        Tag::FootnoteDefinition(label) => NodeKind::FootnoteDefinition {
            identifier: label.to_string(),
        },
        Tag::Table(_) => NodeKind::Table,
        Tag::TableHead | Tag::TableRow => NodeKind::TableRow,
        Tag::TableCell => NodeKind::TableCell,
        Tag::Emphasis => NodeKind::Emphasis,
        Tag::Strong => NodeKind::Strong,
        Tag::Strikethrough => NodeKind::Delete,
        Tag::Link { dest_url, title, .. } => NodeKind::Link {
            url: dest_url.to_string(),
            title: (!title.is_empty()).then(|| title.to_string()),
        },
        Tag::Image { dest_url, title, .. } => NodeKind::Image {
            url: dest_url.to_string(),
            title: (!title.is_empty()).then(|| title.to_string()),
            alt: String::new(),
        },
        Tag::MetadataBlock(_) => NodeKind::Yaml {
            value: String::new(),
        },
        Tag::DefinitionList => other("definitionList"),
        Tag::DefinitionListTitle => other("definitionTerm"),
        Tag::DefinitionListDefinition => other("definitionDescription"),
        Tag::Superscript => other("superscript"),
        Tag::Subscript => other("subscript"),
    }
}

#[inline]
fn other(name: &str) -> NodeKind {
    NodeKind::Other {
        name: name.to_string(),
    }
}
