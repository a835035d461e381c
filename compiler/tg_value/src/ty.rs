//! Go-shaped type descriptors.
//!
//! A [`Type`] describes the static type of a [`Value`](crate::Value) the way
//! a reflective runtime would report it. `Display` produces the runtime type
//! string (`*main.Node`, `map[string]int`, `[]interface {}`), which is what
//! the code generator prints after qualifier stripping.

use std::fmt;
use std::rc::Rc;

use crate::Kind;

/// Shared handle to a type descriptor.
pub type TypeRef = Rc<Type>;

/// A type descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    /// Predeclared scalar types and `unsafe.Pointer`.
    Basic(Kind),
    /// `*T`
    Pointer(TypeRef),
    /// `[]T`
    Slice(TypeRef),
    /// `[N]T`
    Array { len: usize, elem: TypeRef },
    /// `map[K]V`
    Map { key: TypeRef, value: TypeRef },
    /// The empty interface.
    Interface,
    /// An anonymous struct type.
    Struct(Vec<StructField>),
    /// A defined type. An empty package means a predeclared name such as `error`.
    Named {
        package: String,
        name: String,
        underlying: TypeRef,
    },
    /// A function type, described by its signature text.
    Func(String),
}

/// A field of an anonymous struct type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StructField {
    pub name: String,
    pub ty: TypeRef,
}

impl Type {
    /// Create a predeclared scalar type.
    ///
    /// Non-scalar kinds other than `UnsafePointer` have no basic form and are
    /// reported as `Interface`.
    pub fn basic(kind: Kind) -> TypeRef {
        if kind.is_scalar() || kind == Kind::UnsafePointer {
            Rc::new(Type::Basic(kind))
        } else {
            Rc::new(Type::Interface)
        }
    }

    pub fn bool() -> TypeRef {
        Self::basic(Kind::Bool)
    }

    pub fn int() -> TypeRef {
        Self::basic(Kind::Int)
    }

    pub fn int8() -> TypeRef {
        Self::basic(Kind::Int8)
    }

    pub fn int16() -> TypeRef {
        Self::basic(Kind::Int16)
    }

    pub fn int32() -> TypeRef {
        Self::basic(Kind::Int32)
    }

    pub fn int64() -> TypeRef {
        Self::basic(Kind::Int64)
    }

    pub fn uint() -> TypeRef {
        Self::basic(Kind::Uint)
    }

    pub fn uint8() -> TypeRef {
        Self::basic(Kind::Uint8)
    }

    pub fn uint16() -> TypeRef {
        Self::basic(Kind::Uint16)
    }

    pub fn uint32() -> TypeRef {
        Self::basic(Kind::Uint32)
    }

    pub fn uint64() -> TypeRef {
        Self::basic(Kind::Uint64)
    }

    pub fn uintptr() -> TypeRef {
        Self::basic(Kind::Uintptr)
    }

    pub fn float32() -> TypeRef {
        Self::basic(Kind::Float32)
    }

    pub fn float64() -> TypeRef {
        Self::basic(Kind::Float64)
    }

    pub fn string() -> TypeRef {
        Self::basic(Kind::String)
    }

    pub fn unsafe_pointer() -> TypeRef {
        Self::basic(Kind::UnsafePointer)
    }

    /// The empty interface, `any`.
    pub fn any() -> TypeRef {
        Rc::new(Type::Interface)
    }

    pub fn pointer_to(elem: TypeRef) -> TypeRef {
        Rc::new(Type::Pointer(elem))
    }

    pub fn slice_of(elem: TypeRef) -> TypeRef {
        Rc::new(Type::Slice(elem))
    }

    pub fn array_of(len: usize, elem: TypeRef) -> TypeRef {
        Rc::new(Type::Array { len, elem })
    }

    pub fn map_of(key: TypeRef, value: TypeRef) -> TypeRef {
        Rc::new(Type::Map { key, value })
    }

    /// An anonymous struct type with the given fields, in declaration order.
    pub fn structure<'a>(fields: impl IntoIterator<Item = (&'a str, TypeRef)>) -> TypeRef {
        Rc::new(Type::Struct(
            fields
                .into_iter()
                .map(|(name, ty)| StructField {
                    name: name.to_string(),
                    ty,
                })
                .collect(),
        ))
    }

    /// A defined type `package.name` with the given underlying type.
    pub fn named(package: &str, name: &str, underlying: TypeRef) -> TypeRef {
        Rc::new(Type::Named {
            package: package.to_string(),
            name: name.to_string(),
            underlying,
        })
    }

    /// A function type such as `func(int) string`.
    pub fn func(signature: &str) -> TypeRef {
        Rc::new(Type::Func(signature.to_string()))
    }

    /// The type with all `Named` wrappers removed.
    pub fn underlying(&self) -> &Type {
        let mut ty = self;
        while let Type::Named { underlying, .. } = ty {
            ty = underlying;
        }
        ty
    }

    /// The kind of values of this type.
    pub fn kind(&self) -> Kind {
        match self.underlying() {
            Type::Basic(kind) => *kind,
            Type::Pointer(_) => Kind::Pointer,
            Type::Slice(_) => Kind::Slice,
            Type::Array { .. } => Kind::Array,
            Type::Map { .. } => Kind::Map,
            Type::Interface => Kind::Interface,
            Type::Struct(_) => Kind::Struct,
            Type::Func(_) => Kind::Func,
            // `underlying` never stops at a named type.
            Type::Named { .. } => Kind::Invalid,
        }
    }

    /// Element type of a pointer, slice, or array; value type of a map.
    pub fn elem(&self) -> Option<&TypeRef> {
        match self.underlying() {
            Type::Pointer(elem) | Type::Slice(elem) | Type::Array { elem, .. } => Some(elem),
            Type::Map { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Whether this is a defined (named) type.
    pub fn is_named(&self) -> bool {
        matches!(self, Type::Named { .. })
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Basic(kind) => f.write_str(kind.name()),
            Type::Pointer(elem) => write!(f, "*{elem}"),
            Type::Slice(elem) => write!(f, "[]{elem}"),
            Type::Array { len, elem } => write!(f, "[{len}]{elem}"),
            Type::Map { key, value } => write!(f, "map[{key}]{value}"),
            Type::Interface => f.write_str("interface {}"),
            Type::Struct(fields) => {
                if fields.is_empty() {
                    return f.write_str("struct {}");
                }
                f.write_str("struct { ")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{} {}", field.name, field.ty)?;
                }
                f.write_str(" }")
            }
            Type::Named { package, name, .. } => {
                if package.is_empty() {
                    f.write_str(name)
                } else {
                    write!(f, "{package}.{name}")
                }
            }
            Type::Func(signature) => f.write_str(signature),
        }
    }
}
