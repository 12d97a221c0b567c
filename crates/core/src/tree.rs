//! The parse result: an immutable tree of matched options and commands.

use std::fmt;

use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Flat storage for one node. Relations are indices into [`Tree::nodes`],
/// ordered depth-first (the root is index 0).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NodeRecord {
    pub(crate) id: Option<String>,
    pub(crate) name: Option<String>,
    pub(crate) raw: Option<String>,
    pub(crate) alias: Option<String>,
    pub(crate) depth: usize,
    pub(crate) args: Vec<String>,
    pub(crate) parent: Option<usize>,
    pub(crate) children: Vec<usize>,
    pub(crate) ancestors: Vec<usize>,
    pub(crate) descendants: Vec<usize>,
}

/// A parsed argument tree.
///
/// Nodes are reached through [`Node`] handles starting at [`Tree::root`].
#[derive(Clone, PartialEq, Eq)]
pub struct Tree {
    nodes: Vec<NodeRecord>,
}

impl Tree {
    pub(crate) fn new(nodes: Vec<NodeRecord>) -> Self {
        debug_assert!(!nodes.is_empty(), "a tree always has a root");
        Self { nodes }
    }

    /// The root node.
    pub fn root(&self) -> Node<'_> {
        self.node(0)
    }

    /// Total number of nodes, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every node in depth-first order, starting with the root.
    pub fn iter(&self) -> impl Iterator<Item = Node<'_>> {
        (0..self.nodes.len()).map(|index| self.node(index))
    }

    fn node(&self, index: usize) -> Node<'_> {
        Node { tree: self, index }
    }

    fn nodes(&self, indices: &[usize]) -> Vec<Node<'_>> {
        indices.iter().map(|&index| self.node(index)).collect()
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree").field("root", &self.root()).finish()
    }
}

impl Serialize for Tree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.root().serialize(serializer)
    }
}

/// A borrowed handle to one node of a [`Tree`].
#[derive(Clone, Copy)]
pub struct Node<'a> {
    tree: &'a Tree,
    index: usize,
}

impl<'a> Node<'a> {
    fn record(&self) -> &'a NodeRecord {
        &self.tree.nodes[self.index]
    }

    /// The node id. Defaults to the raw argument, so it is only `None` for a
    /// root without an explicit id.
    pub fn id(&self) -> Option<&'a str> {
        self.record().id.as_deref()
    }

    /// The display name from the options.
    pub fn name(&self) -> Option<&'a str> {
        self.record().name.as_deref()
    }

    /// The parsed argument. `None` for the root.
    pub fn raw(&self) -> Option<&'a str> {
        self.record().raw.as_deref()
    }

    /// The alias used to reach this node.
    pub fn alias(&self) -> Option<&'a str> {
        self.record().alias.as_deref()
    }

    /// Zero at the root.
    pub fn depth(&self) -> usize {
        self.record().depth
    }

    /// The positional arguments saved to this node.
    pub fn args(&self) -> &'a [String] {
        &self.record().args
    }

    /// The parent node. `None` for the root.
    pub fn parent(&self) -> Option<Node<'a>> {
        self.record().parent.map(|index| self.tree.node(index))
    }

    /// Direct children, in parse order.
    pub fn children(&self) -> Vec<Node<'a>> {
        self.tree.nodes(&self.record().children)
    }

    /// Ancestors from the root down to the parent.
    pub fn ancestors(&self) -> Vec<Node<'a>> {
        self.tree.nodes(&self.record().ancestors)
    }

    /// All nodes below this one, depth-first.
    pub fn descendants(&self) -> Vec<Node<'a>> {
        self.tree.nodes(&self.record().descendants)
    }

    /// Position of this node in depth-first order.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.index == other.index
    }
}

impl Eq for Node<'_> {}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.record();
        f.debug_struct("Node")
            .field("id", &record.id)
            .field("name", &record.name)
            .field("raw", &record.raw)
            .field("alias", &record.alias)
            .field("depth", &record.depth)
            .field("args", &record.args)
            .field("children", &self.children())
            .finish()
    }
}

/// Serialized without the parent, ancestors and descendants, which are
/// derivable from `children`.
impl Serialize for Node<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let record = self.record();
        let mut state = serializer.serialize_struct("Node", 7)?;
        state.serialize_field("id", &record.id)?;
        state.serialize_field("name", &record.name)?;
        state.serialize_field("raw", &record.raw)?;
        state.serialize_field("alias", &record.alias)?;
        state.serialize_field("depth", &record.depth)?;
        state.serialize_field("args", &record.args)?;
        state.serialize_field("children", &self.children())?;
        state.end()
    }
}
