//! Output document tree.
//!
//! SVD never mixes text and child elements in one element, and the indenting
//! serializer relies on that: a parent's text slot holds its children's
//! indentation, a leaf's holds its value. [`Node`] makes the split explicit
//! so a malformed node cannot be built in the first place.

use std::fmt::Display;

/// A node of the output document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// An element holding a single text value.
    Leaf { tag: String, text: String },
    /// An element holding attributes and child nodes, no text.
    Parent {
        tag: String,
        attributes: Vec<(String, String)>,
        children: Vec<Node>,
    },
    /// An XML comment.
    Comment { text: String },
}

impl Node {
    /// Leaf element. Surrounding whitespace in the value is dropped.
    pub fn leaf(tag: impl Into<String>, text: impl Display) -> Self {
        Node::Leaf {
            tag: tag.into(),
            text: text.to_string().trim().to_string(),
        }
    }

    /// A comment. `--` may not appear in XML comment text and the text may
    /// not end in `-`, so both are broken up with spaces.
    pub fn comment(text: impl Into<String>) -> Self {
        let mut text = text.into();
        while text.contains("--") {
            text = text.replace("--", "- -");
        }
        if text.ends_with('-') {
            text.push(' ');
        }
        Node::Comment { text }
    }

    /// Element name; `None` for comments.
    pub fn tag(&self) -> Option<&str> {
        match self {
            Node::Leaf { tag, .. } | Node::Parent { tag, .. } => Some(tag),
            Node::Comment { .. } => None,
        }
    }

    /// Text of a leaf.
    pub fn text(&self) -> Option<&str> {
        match self {
            Node::Leaf { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Parent { children, .. } => children,
            _ => &[],
        }
    }

    pub fn attributes(&self) -> &[(String, String)] {
        match self {
            Node::Parent { attributes, .. } => attributes,
            _ => &[],
        }
    }

    pub fn is_parent(&self) -> bool {
        matches!(self, Node::Parent { .. })
    }

    /// First child element named `tag`.
    pub fn child(&self, tag: &str) -> Option<&Node> {
        self.children().iter().find(|c| c.tag() == Some(tag))
    }

    /// All child elements named `tag`, in document order.
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.children().iter().filter(move |c| c.tag() == Some(tag))
    }

    /// Text of the first leaf child named `tag`.
    pub fn child_text(&self, tag: &str) -> Option<&str> {
        self.child(tag).and_then(Node::text)
    }
}

/// Incremental construction of a [`Node::Parent`].
///
/// Leaves are usually added before nested parents so that the short values
/// of an element read first.
#[derive(Debug, Clone)]
pub struct NodeBuilder {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl NodeBuilder {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn leaf(mut self, tag: &str, text: impl Display) -> Self {
        self.children.push(Node::leaf(tag, text));
        self
    }

    /// Add a leaf only when a value is present.
    pub fn leaf_opt<T: Display>(self, tag: &str, text: Option<T>) -> Self {
        match text {
            Some(text) => self.leaf(tag, text),
            None => self,
        }
    }

    pub fn child(mut self, node: Node) -> Self {
        self.children.push(node);
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(nodes);
        self
    }

    pub fn build(self) -> Node {
        Node::Parent {
            tag: self.tag,
            attributes: self.attributes,
            children: self.children,
        }
    }
}

/// Lower-case hexadecimal with a `0x` prefix, as SVD tools expect.
pub fn hex(value: u64) -> String {
    format!("{value:#x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_text_never_holds_double_hyphen() {
        let Node::Comment { text } = Node::comment("end of spi--host") else {
            panic!("expected comment");
        };
        assert_eq!(text, "end of spi- -host");

        let Node::Comment { text } = Node::comment("end of a---") else {
            panic!("expected comment");
        };
        assert!(!text.contains("--"));
        assert!(!text.ends_with('-'));
    }

    #[test]
    fn leaf_text_is_trimmed() {
        let node = Node::leaf("description", "  spans lines\n ");
        assert_eq!(node.text(), Some("spans lines"));
        assert!(node.children().is_empty());
        assert!(!node.is_parent());
    }

    #[test]
    fn builder_keeps_order() {
        let node = NodeBuilder::new("register")
            .attribute("derivedFrom", "OTHER")
            .leaf("name", "CTRL")
            .leaf_opt("size", None::<u32>)
            .leaf_opt("resetValue", Some(hex(0)))
            .child(NodeBuilder::new("fields").build())
            .build();

        let tags: Vec<_> = node.children().iter().filter_map(Node::tag).collect();
        assert_eq!(tags, ["name", "resetValue", "fields"]);
        assert_eq!(node.child_text("resetValue"), Some("0x0"));
        assert_eq!(node.attributes()[0].1, "OTHER");
        assert!(node.child("fields").unwrap().is_parent());
    }

    #[test]
    fn comments_have_no_tag() {
        let node = Node::comment("end of uart");
        assert_eq!(node.tag(), None);
        assert_eq!(node.text(), None);
    }

    #[test]
    fn hex_rendering() {
        assert_eq!(hex(0), "0x0");
        assert_eq!(hex(0x4000_0000), "0x40000000");
        assert_eq!(hex(0xAB), "0xab");
    }
}
