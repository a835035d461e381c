//! Graph nodes and their identifiers.

use std::fmt;

use smallvec::SmallVec;
use tg_value::{Kind, Literal};

/// Ordinal of a node in a [`Graph`](crate::Graph).
///
/// Ordinals start at 1 and follow registration order; 0 is reserved as the
/// invalid sentinel.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Invalid node ID (sentinel value).
    pub const INVALID: NodeId = NodeId(0);

    #[inline]
    pub const fn new(ordinal: u32) -> Self {
        NodeId(ordinal)
    }

    /// Get the raw ordinal.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }

    /// Position in the node arena.
    #[inline]
    pub(crate) const fn slot(self) -> usize {
        (self.0 as usize).wrapping_sub(1)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "NodeId({})", self.0)
        } else {
            write!(f, "NodeId::INVALID")
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::INVALID
    }
}

/// What a node stands for.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// A width-tagged literal. `kind` is the scalar kind of the value's type.
    Scalar { kind: Kind, lit: Literal },
    /// A nil pointer, interface, slice, map, or untyped nil.
    Nil,
    /// Non-nil pointer; the single child is the pointee.
    Pointer,
    /// Non-nil interface; the single child is the dynamic value.
    Box,
    /// Children are [`NodeKind::FieldSlot`]s in declaration order.
    Struct,
    /// Children are [`NodeKind::ElementSlot`]s.
    Slice,
    /// Children are [`NodeKind::ElementSlot`]s.
    Array,
    /// Children are [`NodeKind::MapKey`]s in canonical key order.
    Map,
    /// Struct field; the single child is the field value.
    FieldSlot { name: String, ordinal: u32 },
    /// Slice or array element; the single child is the element value.
    ElementSlot { ordinal: u32 },
    /// Map entry; children are the key and then the value.
    MapKey { ordinal: u32 },
    /// Non-owning edge to an already registered node.
    Reference(NodeId),
    /// Pre-rendered text from a substitution rule or an unsupported value.
    Opaque(String),
}

impl NodeKind {
    /// Short label used in graph dumps.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Scalar { .. } => "Scalar",
            NodeKind::Nil => "Nil",
            NodeKind::Pointer => "Pointer",
            NodeKind::Box => "Box",
            NodeKind::Struct => "Struct",
            NodeKind::Slice => "Slice",
            NodeKind::Array => "Array",
            NodeKind::Map => "Map",
            NodeKind::FieldSlot { .. } => "FieldSlot",
            NodeKind::ElementSlot { .. } => "ElementSlot",
            NodeKind::MapKey { .. } => "MapKey",
            NodeKind::Reference(_) => "Reference",
            NodeKind::Opaque(_) => "Opaque",
        }
    }

    /// Whether this node is a slot between a container and a value.
    pub fn is_slot(&self) -> bool {
        matches!(
            self,
            NodeKind::FieldSlot { .. } | NodeKind::ElementSlot { .. } | NodeKind::MapKey { .. }
        )
    }
}

/// How the zero value of a node's type is spelled.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Zero {
    /// `nil`
    Nil,
    /// `T{}`
    Composite,
    /// `0`
    Number,
    /// `false`
    Bool,
    /// `""`
    String,
}

impl Zero {
    /// The zero for values of `kind`.
    pub fn of(kind: Kind) -> Self {
        match kind {
            Kind::Struct | Kind::Array => Zero::Composite,
            Kind::Bool => Zero::Bool,
            Kind::String => Zero::String,
            k if k.is_scalar() => Zero::Number,
            _ => Zero::Nil,
        }
    }
}

/// A vertex of the value graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    /// Runtime type string of the value, qualifiers intact.
    pub type_name: String,
    pub zero: Zero,
    pub children: SmallVec<[NodeId; 2]>,
}

impl Node {
    pub fn new(kind: NodeKind, type_name: String, zero: Zero) -> Self {
        Node {
            kind,
            type_name,
            zero,
            children: SmallVec::new(),
        }
    }

    /// The first child, or `INVALID` for leaves.
    pub fn child(&self) -> NodeId {
        self.children.first().copied().unwrap_or(NodeId::INVALID)
    }
}
