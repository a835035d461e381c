//! Value to graph marshaling.
//!
//! The [`Marshaler`] walks a [`Value`] depth first and records one node per
//! value, slot, and map entry. Containers are registered with the
//! [`IdentityRegistry`] before their children are visited, so a value that
//! reaches itself again turns into a [`NodeKind::Reference`] instead of
//! recursing forever.

use rustc_hash::FxHashMap;
use tg_value::{InterfaceValue, PointerValue, Value};
use tracing::{debug, trace};

use crate::stack::ensure_sufficient_stack;
use crate::{Graph, IdentityRegistry, MarshalError, MarshalResult, Node, NodeId, NodeKind, Zero};

/// Render function for a substituted type.
pub type RenderFn = Box<dyn Fn(&Value) -> String>;

/// Rules replacing values of specific types with fixed source text.
///
/// Rules are keyed by the runtime type string (`reflect.Value`,
/// `*time.Location`). A matching value becomes an opaque node holding the
/// rendered text and is not descended into.
#[derive(Default)]
pub struct Substitutions {
    rules: FxHashMap<String, RenderFn>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule for values whose type string is `type_name`.
    #[must_use]
    pub fn with(mut self, type_name: &str, render: impl Fn(&Value) -> String + 'static) -> Self {
        self.insert(type_name, render);
        self
    }

    pub fn insert(&mut self, type_name: &str, render: impl Fn(&Value) -> String + 'static) {
        self.rules.insert(type_name.to_string(), Box::new(render));
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn render(&self, value: &Value) -> Option<String> {
        if self.rules.is_empty() {
            return None;
        }
        self.rules.get(&value.type_name()).map(|render| render(value))
    }
}

/// What to do with values the generator cannot express.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum UnsupportedPolicy {
    /// Fail with [`MarshalError::UnsupportedKind`].
    #[default]
    Error,
    /// Render the value as `nil`.
    Placeholder,
}

/// Marshaling configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarshalOptions {
    /// Share one node between structurally equal structs, arrays, and
    /// interface values.
    pub dedup_values: bool,
    pub unsupported: UnsupportedPolicy,
    /// Maximum number of nodes in one graph.
    pub max_nodes: usize,
    /// Maximum nesting depth of values.
    pub max_depth: usize,
}

impl Default for MarshalOptions {
    fn default() -> Self {
        MarshalOptions {
            dedup_values: false,
            unsupported: UnsupportedPolicy::Error,
            max_nodes: 1_000_000,
            max_depth: 10_000,
        }
    }
}

/// Builds a [`Graph`] from a [`Value`].
///
/// A marshaler can be reused; every call starts from an empty registry.
pub struct Marshaler {
    substitutions: Substitutions,
    options: MarshalOptions,
    registry: IdentityRegistry,
    nodes: Vec<Node>,
    /// Containers whose children are being visited, outermost first.
    open: Vec<NodeId>,
    /// Length of `open` when each enclosing map key started.
    key_floors: Vec<usize>,
    depth: usize,
}

impl Marshaler {
    pub fn new(substitutions: Substitutions) -> Self {
        let options = MarshalOptions::default();
        Marshaler {
            substitutions,
            registry: IdentityRegistry::new(options.dedup_values),
            options,
            nodes: Vec::new(),
            open: Vec::new(),
            key_floors: Vec::new(),
            depth: 0,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: MarshalOptions) -> Self {
        self.registry = IdentityRegistry::new(options.dedup_values);
        self.options = options;
        self
    }

    pub fn options(&self) -> &MarshalOptions {
        &self.options
    }

    /// Marshal `value` into a fresh graph.
    pub fn marshal(&mut self, value: &Value) -> MarshalResult<Graph> {
        self.reset();
        if self.options.unsupported == UnsupportedPolicy::Placeholder
            && is_unsupported(value)
            && self.substitutions.render(value).is_none()
        {
            return Err(MarshalError::InvalidRoot {
                type_name: value.type_name(),
                reason: "an unsupported value cannot stand in for the whole result",
            });
        }

        let root = self.visit(value);
        let nodes = std::mem::take(&mut self.nodes);
        let root = root?;
        debug!(
            nodes = nodes.len(),
            registered = self.registry.len(),
            root_type = %value.type_name(),
            "marshaled value graph"
        );
        Ok(Graph::new(nodes, root))
    }

    fn reset(&mut self) {
        self.registry.clear();
        self.nodes.clear();
        self.open.clear();
        self.key_floors.clear();
        self.depth = 0;
    }

    fn visit(&mut self, value: &Value) -> MarshalResult<NodeId> {
        if self.depth >= self.options.max_depth {
            return Err(MarshalError::DepthLimitExceeded {
                limit: self.options.max_depth,
            });
        }
        self.depth += 1;
        let result = ensure_sufficient_stack(|| self.visit_value(value));
        self.depth -= 1;
        result
    }

    fn visit_value(&mut self, value: &Value) -> MarshalResult<NodeId> {
        if let Some(text) = self.substitutions.render(value) {
            trace!(ty = %value.type_name(), "substituted value");
            return self.push_for(NodeKind::Opaque(text), value);
        }

        match value {
            Value::Func(_) | Value::UnsafePointer(_) => self.unsupported(value),
            Value::Nil => self.push_for(NodeKind::Nil, value),
            _ if value.is_nil() => self.push_for(NodeKind::Nil, value),
            Value::Scalar(scalar) => self.push_for(
                NodeKind::Scalar {
                    kind: scalar.ty().kind(),
                    lit: scalar.literal().clone(),
                },
                value,
            ),
            Value::Pointer(pointer) => self.visit_pointer(value, pointer),
            Value::Interface(boxed) => self.visit_box(value, boxed),
            Value::Struct(_) => self.visit_struct(value),
            Value::Slice(_) => self.visit_elements(value, NodeKind::Slice),
            Value::Array(_) => self.visit_elements(value, NodeKind::Array),
            Value::Map(_) => self.visit_map(value),
        }
    }

    fn visit_pointer(&mut self, value: &Value, pointer: &PointerValue) -> MarshalResult<NodeId> {
        if let Some(reference) = self.lookup_reference(value)? {
            return Ok(reference);
        }
        let Some(pointee) = pointer.pointee() else {
            return self.push_for(NodeKind::Nil, value);
        };
        let id = self.begin(NodeKind::Pointer, value)?;
        let child = self.visit(&pointee)?;
        self.attach(id, child);
        self.end();
        Ok(id)
    }

    fn visit_box(&mut self, value: &Value, boxed: &InterfaceValue) -> MarshalResult<NodeId> {
        if let Some(reference) = self.lookup_reference(value)? {
            return Ok(reference);
        }
        let Some(inner) = boxed.inner() else {
            return self.push_for(NodeKind::Nil, value);
        };
        let id = self.begin(NodeKind::Box, value)?;
        let child = self.visit(inner)?;
        self.attach(id, child);
        self.end();
        Ok(id)
    }

    fn visit_struct(&mut self, value: &Value) -> MarshalResult<NodeId> {
        if let Some(reference) = self.lookup_reference(value)? {
            return Ok(reference);
        }
        let id = self.begin(NodeKind::Struct, value)?;
        for (i, field) in value.fields().unwrap_or_default().iter().enumerate() {
            let kind = NodeKind::FieldSlot {
                name: field.name.clone(),
                ordinal: ordinal(i),
            };
            let slot = self.push_for(kind, &field.value)?;
            self.attach(id, slot);
            let child = self.visit(&field.value)?;
            self.attach(slot, child);
        }
        self.end();
        Ok(id)
    }

    fn visit_elements(&mut self, value: &Value, kind: NodeKind) -> MarshalResult<NodeId> {
        if let Some(reference) = self.lookup_reference(value)? {
            return Ok(reference);
        }
        let Some(elems) = value.elements() else {
            return self.push_for(NodeKind::Nil, value);
        };
        let id = self.begin(kind, value)?;
        for (i, elem) in elems.iter().enumerate() {
            let slot = self.push_for(NodeKind::ElementSlot { ordinal: ordinal(i) }, elem)?;
            self.attach(id, slot);
            let child = self.visit(elem)?;
            self.attach(slot, child);
        }
        self.end();
        Ok(id)
    }

    fn visit_map(&mut self, value: &Value) -> MarshalResult<NodeId> {
        if let Some(reference) = self.lookup_reference(value)? {
            return Ok(reference);
        }
        let Some(entries) = value.entries() else {
            return self.push_for(NodeKind::Nil, value);
        };
        let id = self.begin(NodeKind::Map, value)?;

        let mut order: Vec<(String, usize)> = entries
            .iter()
            .enumerate()
            .map(|(i, (key, _))| (key.canonical_key(), i))
            .collect();
        order.sort();

        for (n, &(_, i)) in order.iter().enumerate() {
            let (key, elem) = &entries[i];
            let slot = self.push_for(NodeKind::MapKey { ordinal: ordinal(n) }, elem)?;
            self.attach(id, slot);

            self.key_floors.push(self.open.len());
            let key_node = self.visit(key);
            self.key_floors.pop();
            let key_node = key_node?;
            self.attach(slot, key_node);

            let elem_node = self.visit(elem)?;
            self.attach(slot, elem_node);
        }
        self.end();
        Ok(id)
    }

    fn unsupported(&mut self, value: &Value) -> MarshalResult<NodeId> {
        match self.options.unsupported {
            UnsupportedPolicy::Error => Err(MarshalError::UnsupportedKind {
                kind: value.kind(),
                type_name: value.type_name(),
            }),
            UnsupportedPolicy::Placeholder => {
                debug!(ty = %value.type_name(), "unsupported value rendered as nil");
                self.push_for(NodeKind::Opaque("nil".to_string()), value)
            }
        }
    }

    /// Emit a reference if `value` was registered already.
    fn lookup_reference(&mut self, value: &Value) -> MarshalResult<Option<NodeId>> {
        let Some(target) = self.registry.lookup(value) else {
            return Ok(None);
        };
        if self.escapes_map_key(target) {
            return Err(MarshalError::CyclicMapKey {
                type_name: value.type_name(),
            });
        }
        debug!(target = target.raw(), ty = %value.type_name(), "identity hit");
        self.push_for(NodeKind::Reference(target), value).map(Some)
    }

    /// Whether `target` encloses the map key being visited.
    ///
    /// A key is rendered inside its map's literal, so it cannot be patched
    /// after the enclosing value exists.
    fn escapes_map_key(&self, target: NodeId) -> bool {
        match self.key_floors.last() {
            Some(&floor) => self.open[..floor].contains(&target),
            None => false,
        }
    }

    /// Create and register a container before its children are visited.
    fn begin(&mut self, kind: NodeKind, value: &Value) -> MarshalResult<NodeId> {
        let id = self.push_for(kind, value)?;
        self.registry.register(value, id);
        self.open.push(id);
        Ok(id)
    }

    fn end(&mut self) {
        self.open.pop();
    }

    fn push_for(&mut self, kind: NodeKind, value: &Value) -> MarshalResult<NodeId> {
        let limit = self.options.max_nodes;
        if self.nodes.len() >= limit {
            return Err(MarshalError::NodeLimitExceeded { limit });
        }
        trace!(kind = kind.label(), ty = %value.type_name(), "node");
        self.nodes
            .push(Node::new(kind, value.type_name(), Zero::of(value.kind())));
        let ordinal =
            u32::try_from(self.nodes.len()).map_err(|_| MarshalError::NodeLimitExceeded { limit })?;
        Ok(NodeId::new(ordinal))
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.nodes.get_mut(parent.slot()) {
            node.children.push(child);
        }
    }
}

fn is_unsupported(value: &Value) -> bool {
    matches!(value, Value::Func(_) | Value::UnsafePointer(_))
}

fn ordinal(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}
