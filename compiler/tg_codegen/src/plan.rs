//! Declaration planning.
//!
//! Decides, before any code is emitted, which nodes get a variable of their
//! own. Everything else is rendered inline inside its container's literal.

use rustc_hash::FxHashSet;
use tg_graph::{Graph, NodeId, NodeKind};
use tracing::debug;

/// The set of nodes that are declared as variables.
///
/// A node is declared when it is
/// - the root,
/// - the target of a reference,
/// - a non-nil pointer, slice, or map, or
/// - a struct or array reached only through a map value or an interface,
///   when something inside it has to be patched. Such a location cannot be
///   assigned through, so the aggregate is built in a variable and copied in.
pub struct DeclarationPlan {
    declared: FxHashSet<NodeId>,
}

impl DeclarationPlan {
    pub fn new(graph: &Graph) -> Self {
        let mut declared = FxHashSet::default();
        let root = graph.root();
        if root.is_valid() {
            declared.insert(root);
        }
        for (id, node) in graph.iter() {
            match node.kind {
                NodeKind::Reference(target) => {
                    declared.insert(target);
                }
                NodeKind::Pointer | NodeKind::Slice | NodeKind::Map => {
                    declared.insert(id);
                }
                _ => {}
            }
        }

        let mut plan = DeclarationPlan { declared };
        if root.is_valid() {
            plan.declare_unaddressable(graph, root);
        }
        debug!(declared = plan.len(), nodes = graph.len(), "planned declarations");
        plan
    }

    pub fn is_declared(&self, id: NodeId) -> bool {
        self.declared.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.declared.len()
    }

    /// Walk the owning tree tracking whether each location is addressable.
    fn declare_unaddressable(&mut self, graph: &Graph, root: NodeId) {
        let mut stack = vec![(root, false)];
        while let Some((id, unaddressable)) = stack.pop() {
            let node = graph.node(id);
            match node.kind {
                NodeKind::Struct | NodeKind::Array => {
                    let mut inner = unaddressable && !self.is_declared(id);
                    if inner && self.needs_patch(graph, id) {
                        self.declared.insert(id);
                        inner = false;
                    }
                    stack.extend(node.children.iter().map(|&child| (child, inner)));
                }
                NodeKind::FieldSlot { .. } | NodeKind::ElementSlot { .. } => {
                    stack.extend(node.children.iter().map(|&child| (child, unaddressable)));
                }
                NodeKind::Map | NodeKind::MapKey { .. } | NodeKind::Box => {
                    stack.extend(node.children.iter().map(|&child| (child, true)));
                }
                NodeKind::Pointer | NodeKind::Slice => {
                    stack.extend(node.children.iter().map(|&child| (child, false)));
                }
                NodeKind::Scalar { .. }
                | NodeKind::Nil
                | NodeKind::Reference(_)
                | NodeKind::Opaque(_) => {}
            }
        }
    }

    /// Whether rendering `id` inline would leave a slot to patch later.
    fn needs_patch(&self, graph: &Graph, id: NodeId) -> bool {
        let mut stack: Vec<NodeId> = graph.node(id).children.to_vec();
        while let Some(id) = stack.pop() {
            let node = graph.node(id);
            if matches!(node.kind, NodeKind::Reference(_)) || self.is_declared(id) {
                return true;
            }
            match node.kind {
                NodeKind::Struct
                | NodeKind::Array
                | NodeKind::Box
                | NodeKind::FieldSlot { .. }
                | NodeKind::ElementSlot { .. } => stack.extend(node.children.iter().copied()),
                _ => {}
            }
        }
        false
    }
}
