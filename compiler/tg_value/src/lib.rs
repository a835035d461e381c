//! Dynamic value model for the typegen pipeline.
//!
//! The generator works on values it cannot see statically, so callers hand it
//! a [`Value`]: a tree of scalars and aggregates whose pointers, slices, and
//! maps may share storage and form cycles. The operations here are the
//! introspection surface the graph builder relies on:
//!
//! - [`Value::kind`], [`Value::type_of`], [`Value::type_name`]
//! - [`Value::is_nil`] and [`Value::identity`] for reference kinds
//! - [`Value::pointee`], [`Value::fields`], [`Value::elements`], [`Value::entries`]
//! - [`Value::canonical_key`] for ordering map keys
//! - [`structurally_equal`] and [`structural_hash`] for value deduplication

mod equality;
mod identity;
mod kind;
mod ty;
mod value;

pub use equality::{structural_fingerprint, structural_hash, structurally_equal};
pub use identity::Identity;
pub use kind::Kind;
pub use ty::{StructField, Type, TypeRef};
pub use value::{
    ArrayValue, Elements, Field, FuncValue, InterfaceValue, Literal, MapValue, PointerValue,
    ScalarValue, SliceValue, StructBuilder, StructValue, UnsafePointerValue, Value,
};
