//! Arena-backed working tree.
//!
//! Nodes live in a `Vec` and refer to each other by [`NodeId`]. Each node
//! stores its parent index and an ordered list of child indices, so removing
//! a subtree or splicing children into a parent is index rewriting with no
//! shared ownership. Detached nodes simply become unreachable and are freed
//! with the arena.

/// Index of a node inside a [`Document`].
pub type NodeId = usize;

/// A single `name="value"` pair. Names are lowercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Node payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Synthetic root of the parsed shell.
    Document,
    Element {
        tag: String,
        /// Source order; names are unique.
        attributes: Vec<Attribute>,
    },
    Text(String),
    Comment(String),
}

#[derive(Debug)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A parsed document: the arena plus its root.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    /// Root node id. Always `0`.
    pub const ROOT: NodeId = 0;

    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Allocate a detached node.
    pub fn create(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
        });
        self.nodes.len() - 1
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// Adjacent text is merged into the previous text node.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        let merge_into = match (&self.nodes[child].kind, self.nodes[parent].children.last()) {
            (NodeKind::Text(_), Some(&last)) if matches!(self.nodes[last].kind, NodeKind::Text(_)) => {
                Some(last)
            }
            _ => None,
        };

        if let Some(last) = merge_into {
            let taken = std::mem::replace(&mut self.nodes[child].kind, NodeKind::Text(String::new()));
            if let (NodeKind::Text(text), NodeKind::Text(existing)) =
                (taken, &mut self.nodes[last].kind)
            {
                existing.push_str(&text);
            }
            return;
        }

        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id].kind
    }

    pub fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    /// Tag name if `id` is an element.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id].kind {
            NodeKind::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    /// Detach and return the child list of `id`.
    ///
    /// The children keep their parent index until they are re-attached with
    /// [`Document::set_children`] or dropped.
    pub fn take_children(&mut self, id: NodeId) -> Vec<NodeId> {
        std::mem::take(&mut self.nodes[id].children)
    }

    /// Replace the child list of `id`, re-parenting every child.
    pub fn set_children(&mut self, id: NodeId, children: Vec<NodeId>) {
        for &child in &children {
            self.nodes[child].parent = Some(id);
        }
        self.nodes[id].children = children;
    }

    /// Clear the parent link of a node that was dropped from its parent.
    pub fn orphan(&mut self, id: NodeId) {
        self.nodes[id].parent = None;
    }

    /// First element in document order whose `id` attribute equals `value`.
    pub fn element_by_id(&self, value: &str) -> Option<NodeId> {
        let mut stack = vec![Self::ROOT];
        while let Some(node) = stack.pop() {
            if let NodeKind::Element { attributes, .. } = &self.nodes[node].kind {
                if attributes.iter().any(|a| a.name == "id" && a.value == value) {
                    return Some(node);
                }
            }
            stack.extend(self.nodes[node].children.iter().rev());
        }
        None
    }

    /// Number of allocated nodes, reachable or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
