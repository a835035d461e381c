//! Value graph construction.
//!
//! [`Marshaler::marshal`] turns a [`tg_value::Value`] into a [`Graph`]: an
//! arena of [`Node`]s in registration order forming an owning tree, plus
//! [`NodeKind::Reference`] edges wherever a pointer, slice, or map (or, with
//! value deduplication, an equal aggregate) is reached a second time.
//!
//! The graph is immutable once built. Code generation keeps its own
//! bookkeeping keyed by [`NodeId`], so one graph can be rendered many times.

mod error;
mod graph;
mod marshal;
mod node;
mod registry;
mod stack;

pub use error::{MarshalError, MarshalResult};
pub use graph::Graph;
pub use marshal::{Marshaler, MarshalOptions, RenderFn, Substitutions, UnsupportedPolicy};
pub use node::{Node, NodeId, NodeKind, Zero};
pub use registry::IdentityRegistry;
pub use stack::ensure_sufficient_stack;
pub use tg_value::{Kind, Literal};

/// Marshal `value` with default options.
pub fn marshal(value: &tg_value::Value, substitutions: Substitutions) -> MarshalResult<Graph> {
    Marshaler::new(substitutions).marshal(value)
}
