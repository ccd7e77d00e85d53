//! Declaration scaffold tree.
//!
//! Each function context keeps a small tree recording the shape of its
//! declaration statements: a group node per `Dim` line, one child per
//! declared name. Nodes live in an arena and are addressed by
//! generation-tagged ids; clearing the tree invalidates every
//! outstanding id at once, so a stale id can never resolve to a node
//! from a later population.

/// Kind tag for a scaffold node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A `Dim` line.
    Group,
    /// One declared name within a group.
    Declaration,
}

/// Generation-tagged handle. Ids are only meaningful against the tree
/// that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    label: String,
    parent: Option<usize>,
    children: Vec<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct StmtTree {
    nodes: Vec<Node>,
    roots: Vec<usize>,
    generation: u32,
}

impl StmtTree {
    pub fn new() -> Self {
        StmtTree::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn alloc(&mut self, kind: NodeKind, label: &str, parent: Option<usize>) -> NodeId {
        let index = self.nodes.len();
        self.nodes.push(Node {
            kind,
            label: label.to_string(),
            parent,
            children: Vec::new(),
        });
        NodeId {
            index,
            generation: self.generation,
        }
    }

    fn resolve(&self, id: NodeId) -> Option<usize> {
        if id.generation != self.generation || id.index >= self.nodes.len() {
            return None;
        }
        Some(id.index)
    }

    /// Append a node at the end of `parent`'s child list, or at the end
    /// of the root list when `parent` is `None`. Returns `None` for a
    /// stale parent id.
    pub fn append_last(
        &mut self,
        parent: Option<NodeId>,
        kind: NodeKind,
        label: &str,
    ) -> Option<NodeId> {
        let parent_index = match parent {
            Some(p) => Some(self.resolve(p)?),
            None => None,
        };
        let id = self.alloc(kind, label, parent_index);
        match parent_index {
            Some(p) => self.nodes[p].children.push(id.index),
            None => self.roots.push(id.index),
        }
        Some(id)
    }

    /// Insert a new node immediately before `sibling` in its parent's
    /// child list. Exactly one child list changes.
    pub fn insert_before(&mut self, sibling: NodeId, kind: NodeKind, label: &str) -> Option<NodeId> {
        self.insert_adjacent(sibling, kind, label, 0)
    }

    /// Insert a new node immediately after `sibling`.
    pub fn insert_after(&mut self, sibling: NodeId, kind: NodeKind, label: &str) -> Option<NodeId> {
        self.insert_adjacent(sibling, kind, label, 1)
    }

    fn insert_adjacent(
        &mut self,
        sibling: NodeId,
        kind: NodeKind,
        label: &str,
        offset: usize,
    ) -> Option<NodeId> {
        let sibling_index = self.resolve(sibling)?;
        let parent_index = self.nodes[sibling_index].parent;
        let id = self.alloc(kind, label, parent_index);
        let list = match parent_index {
            Some(p) => &mut self.nodes[p].children,
            None => &mut self.roots,
        };
        let pos = list
            .iter()
            .position(|&c| c == sibling_index)
            .map(|p| p + offset)?;
        list.insert(pos, id.index);
        Some(id)
    }

    /// Drop every node and invalidate all outstanding ids.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.roots.clear();
        self.generation += 1;
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.resolve(id).map(|i| self.nodes[i].kind)
    }

    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.resolve(id).map(|i| self.nodes[i].label.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        let index = self.resolve(id)?;
        self.nodes[index].parent.map(|p| NodeId {
            index: p,
            generation: self.generation,
        })
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        match self.resolve(id) {
            Some(index) => self.nodes[index]
                .children
                .iter()
                .map(|&c| NodeId {
                    index: c,
                    generation: self.generation,
                })
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn roots(&self) -> Vec<NodeId> {
        self.roots
            .iter()
            .map(|&r| NodeId {
                index: r,
                generation: self.generation,
            })
            .collect()
    }
}
