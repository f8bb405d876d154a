//! Parsed content, as matched by argument parsers.
//!
//! A [`NodeList`] is a flat view over what an argument contained; the only thing this crate
//! ever does with it is inspect its shape and render it back to source ("verbatim").

use crate::tokens::SourceRange;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Characters, including any whitespace between them.
    Chars(Box<str>),
    /// A control sequence and the whitespace that followed it in the source.
    Macro { name: Box<str>, post_space: Box<str> },
    Specials(Box<str>),
    /// A delimited group; `open`/`close` are the delimiters as written, e.g. `{`/`}` or `(`/`)`.
    Group {
        open: Box<str>,
        close: Box<str>,
        children: NodeList,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Node {
    pub kind: NodeKind,
    pub range: SourceRange,
}
impl Node {
    #[inline]
    #[must_use]
    pub fn chars(chars: &str, range: impl Into<SourceRange>) -> Self {
        Self {
            kind: NodeKind::Chars(chars.into()),
            range: range.into(),
        }
    }
    #[inline]
    #[must_use]
    pub fn control_sequence(name: &str, range: impl Into<SourceRange>) -> Self {
        Self {
            kind: NodeKind::Macro {
                name: name.into(),
                post_space: "".into(),
            },
            range: range.into(),
        }
    }
    #[inline]
    #[must_use]
    pub fn group(
        open: &str,
        close: &str,
        children: impl Into<NodeList>,
        range: impl Into<SourceRange>,
    ) -> Self {
        Self {
            kind: NodeKind::Group {
                open: open.into(),
                close: close.into(),
                children: children.into(),
            },
            range: range.into(),
        }
    }

    /// The children of a group; `None` for anything else.
    #[must_use]
    pub const fn children(&self) -> Option<&NodeList> {
        match &self.kind {
            NodeKind::Group { children, .. } => Some(children),
            _ => None,
        }
    }

    /// The literal text of a chars or specials node.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Chars(s) | NodeKind::Specials(s) => Some(s),
            _ => None,
        }
    }

    pub fn write_verbatim(&self, out: &mut String) {
        match &self.kind {
            NodeKind::Chars(s) | NodeKind::Specials(s) => out.push_str(s),
            NodeKind::Macro { name, post_space } => {
                out.push('\\');
                out.push_str(name);
                out.push_str(post_space);
            }
            NodeKind::Group {
                open,
                close,
                children,
            } => {
                out.push_str(open);
                children.write_verbatim(out);
                out.push_str(close);
            }
        }
    }

    #[must_use]
    pub fn verbatim(&self) -> String {
        let mut s = String::new();
        self.write_verbatim(&mut s);
        s
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NodeList(Vec<Node>);
impl NodeList {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a node, merging adjacent chars into one node.
    pub fn push(&mut self, node: Node) {
        if let NodeKind::Chars(new) = &node.kind
            && let Some(Node {
                kind: NodeKind::Chars(last),
                range,
            }) = self.0.last_mut()
        {
            let mut merged = String::with_capacity(last.len() + new.len());
            merged.push_str(last);
            merged.push_str(new);
            *last = merged.into_boxed_str();
            *range = range.join(node.range);
            return;
        }
        self.0.push(node);
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[Node] {
        &self.0
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.0.iter()
    }

    pub fn write_verbatim(&self, out: &mut String) {
        for n in &self.0 {
            n.write_verbatim(out);
        }
    }

    #[must_use]
    pub fn verbatim(&self) -> String {
        let mut s = String::new();
        self.write_verbatim(&mut s);
        s
    }

    /// Range covered by all nodes, if any.
    #[must_use]
    pub fn range(&self) -> Option<SourceRange> {
        let first = self.0.first()?.range;
        Some(self.0.iter().fold(first, |r, n| r.join(n.range)))
    }
}
impl From<Vec<Node>> for NodeList {
    fn from(nodes: Vec<Node>) -> Self {
        let mut ret = Self::new();
        for n in nodes {
            ret.push(n);
        }
        ret
    }
}
impl<const N: usize> From<[Node; N]> for NodeList {
    #[inline]
    fn from(nodes: [Node; N]) -> Self {
        Vec::from(nodes).into()
    }
}
impl FromIterator<Node> for NodeList {
    fn from_iter<T: IntoIterator<Item = Node>>(iter: T) -> Self {
        let mut ret = Self::new();
        for n in iter {
            ret.push(n);
        }
        ret
    }
}
impl<'a> IntoIterator for &'a NodeList {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

crate::tests! {
    adjacent_chars_are_merged {
        let list = NodeList::from([
            Node::chars("a", 0..1),
            Node::chars(" b", 1..3),
            Node::control_sequence("psi", 3..7),
            Node::chars("c", 7..8),
        ]);
        assert_eq!(list.len(), 3);
        assert_eq!(list.as_slice()[0], Node::chars("a b", 0..3));
        assert_eq!(list.range(), Some(SourceRange::new(0, 8)));
    };
    verbatim_reproduces_source {
        let group = Node::group(
            "{",
            "}",
            [
                Node {
                    kind: NodeKind::Macro { name: "alpha".into(), post_space: " ".into() },
                    range: (1..8).into(),
                },
                Node::chars("x", 8..9),
            ],
            0..10,
        );
        assert_eq!(group.verbatim(), r"{\alpha x}");
        assert_eq!(group.children().map(NodeList::verbatim).as_deref(), Some(r"\alpha x"));
    }
}
