//! The node arena produced by marshaling.
//!
//! Nodes are stored in registration order, so a node's position in the arena
//! is its ordinal. Containers always precede their children, and every
//! [`NodeKind::Reference`] points at a node with a smaller ordinal.

use std::fmt::Write;

use rustc_hash::FxHashSet;

use crate::{Node, NodeId, NodeKind};

/// An immutable value graph: an owning tree rooted at [`Graph::root`] plus
/// non-owning reference edges.
#[derive(Clone, Debug, PartialEq)]
pub struct Graph {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Graph {
    pub(crate) fn new(nodes: Vec<Node>, root: NodeId) -> Self {
        Graph { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of registered nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.is_valid() {
            self.nodes.get(id.slot())
        } else {
            None
        }
    }

    /// Look up a node that is known to exist.
    ///
    /// # Panics
    ///
    /// Panics on `INVALID` or an ordinal past the end, which means the
    /// caller broke the graph's invariants.
    pub fn node(&self, id: NodeId) -> &Node {
        match self.get(id) {
            Some(node) => node,
            None => panic!("internal invariant violated: no node {id:?} in a graph of {}", self.len()),
        }
    }

    /// All nodes in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, node)| {
            // Ordinals are bounded by the node limit, which fits in u32.
            #[allow(clippy::cast_possible_truncation)]
            let id = NodeId::new(i as u32 + 1);
            (id, node)
        })
    }

    /// Every node that is the target of at least one reference.
    pub fn reference_targets(&self) -> FxHashSet<NodeId> {
        self.nodes
            .iter()
            .filter_map(|node| match node.kind {
                NodeKind::Reference(target) => Some(target),
                _ => None,
            })
            .collect()
    }

    /// Render the owning tree as indented text, one node per line.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        if !self.root.is_valid() {
            return out;
        }
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let node = self.node(id);
            for _ in 0..depth {
                out.push_str("  ");
            }
            let _ = write!(out, "{id} {}", node.kind.label());
            match &node.kind {
                NodeKind::Scalar { lit, .. } => {
                    let _ = write!(out, " {} {lit:?}", node.type_name);
                }
                NodeKind::FieldSlot { name, .. } => {
                    let _ = write!(out, " {name}");
                }
                NodeKind::ElementSlot { ordinal } | NodeKind::MapKey { ordinal } => {
                    let _ = write!(out, " [{ordinal}]");
                }
                NodeKind::Reference(target) => {
                    let _ = write!(out, " -> {target}");
                }
                NodeKind::Opaque(text) => {
                    let _ = write!(out, " {text}");
                }
                NodeKind::Nil
                | NodeKind::Pointer
                | NodeKind::Box
                | NodeKind::Struct
                | NodeKind::Slice
                | NodeKind::Array
                | NodeKind::Map => {
                    let _ = write!(out, " {}", node.type_name);
                }
            }
            out.push('\n');
            for &child in node.children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        out
    }
}
