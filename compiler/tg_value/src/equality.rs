//! Structural equality and hashing.
//!
//! Struct, array, interface, and scalar values compare by content. Pointers,
//! slices, and maps compare by identity, so comparing cyclic values always
//! terminates. Function values are never equal, matching the runtime where
//! they are not comparable.

use std::hash::{Hash, Hasher};
use std::rc::Rc;

use rustc_hash::FxHasher;

use crate::{Literal, TypeRef, Value};

fn same_type(a: &TypeRef, b: &TypeRef) -> bool {
    Rc::ptr_eq(a, b) || a == b
}

#[allow(clippy::float_cmp, reason = "scalar equality follows IEEE semantics")]
fn literal_equal(a: &Literal, b: &Literal) -> bool {
    match (a, b) {
        (Literal::Float(x), Literal::Float(y)) => x == y,
        _ => a == b,
    }
}

/// Deep equality as the runtime's `==` would report it.
pub fn structurally_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Nil, Value::Nil) => true,
        (Value::Scalar(x), Value::Scalar(y)) => {
            same_type(x.ty(), y.ty()) && literal_equal(x.literal(), y.literal())
        }
        (Value::Pointer(x), Value::Pointer(y)) => {
            same_type(x.ty(), y.ty()) && a.identity() == b.identity()
        }
        (Value::Slice(x), Value::Slice(y)) => {
            same_type(x.ty(), y.ty()) && a.identity() == b.identity()
        }
        (Value::Map(x), Value::Map(y)) => same_type(x.ty(), y.ty()) && a.identity() == b.identity(),
        (Value::Interface(x), Value::Interface(y)) => {
            same_type(x.ty(), y.ty())
                && match (x.inner(), y.inner()) {
                    (None, None) => true,
                    (Some(p), Some(q)) => structurally_equal(p, q),
                    _ => false,
                }
        }
        (Value::Struct(x), Value::Struct(y)) => {
            same_type(x.ty(), y.ty())
                && x.fields().len() == y.fields().len()
                && x.fields()
                    .iter()
                    .zip(y.fields())
                    .all(|(f, g)| f.name == g.name && structurally_equal(&f.value, &g.value))
        }
        (Value::Array(x), Value::Array(y)) => {
            same_type(x.ty(), y.ty())
                && x.elements().len() == y.elements().len()
                && x.elements()
                    .iter()
                    .zip(y.elements())
                    .all(|(p, q)| structurally_equal(p, q))
        }
        (Value::UnsafePointer(x), Value::UnsafePointer(y)) => x.address() == y.address(),
        _ => false,
    }
}

/// Feed a hash consistent with [`structurally_equal`] into `state`.
#[allow(clippy::float_cmp, reason = "positive and negative zero hash alike")]
pub fn structural_hash<H: Hasher>(value: &Value, state: &mut H) {
    std::mem::discriminant(value).hash(state);
    match value {
        Value::Nil | Value::Func(_) => {}
        Value::Scalar(s) => {
            s.ty().hash(state);
            match s.literal() {
                Literal::Bool(b) => b.hash(state),
                Literal::Int(i) => i.hash(state),
                Literal::Uint(u) => u.hash(state),
                Literal::Float(f) => {
                    let bits = if *f == 0.0 { 0 } else { f.to_bits() };
                    bits.hash(state);
                }
                Literal::Str(text) => text.hash(state),
            }
        }
        Value::Pointer(_) | Value::Slice(_) | Value::Map(_) => value.identity().hash(state),
        Value::Interface(i) => {
            if let Some(inner) = i.inner() {
                structural_hash(inner, state);
            }
        }
        Value::Struct(s) => {
            for field in s.fields() {
                field.name.hash(state);
                structural_hash(&field.value, state);
            }
        }
        Value::Array(a) => {
            for elem in a.elements() {
                structural_hash(elem, state);
            }
        }
        Value::UnsafePointer(p) => p.address().hash(state),
    }
}

/// A 64-bit structural hash of `value`.
pub fn structural_fingerprint(value: &Value) -> u64 {
    let mut hasher = FxHasher::default();
    structural_hash(value, &mut hasher);
    hasher.finish()
}
