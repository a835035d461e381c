//! Value kinds as reported by introspection.

use std::fmt;

/// The kind of a runtime value, independent of any named type wrapping it.
///
/// Mirrors the classification a reflective runtime reports: scalar widths,
/// indirections, aggregates, and the kinds the generator cannot express.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Untyped nil, the kind of a value with no dynamic type.
    Invalid,
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    String,
    Pointer,
    Interface,
    Struct,
    Slice,
    Array,
    Map,
    Func,
    UnsafePointer,
}

impl Kind {
    /// Name of the kind, matching the predeclared type name for scalars.
    pub const fn name(self) -> &'static str {
        match self {
            Kind::Invalid => "invalid",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Int8 => "int8",
            Kind::Int16 => "int16",
            Kind::Int32 => "int32",
            Kind::Int64 => "int64",
            Kind::Uint => "uint",
            Kind::Uint8 => "uint8",
            Kind::Uint16 => "uint16",
            Kind::Uint32 => "uint32",
            Kind::Uint64 => "uint64",
            Kind::Uintptr => "uintptr",
            Kind::Float32 => "float32",
            Kind::Float64 => "float64",
            Kind::String => "string",
            Kind::Pointer => "ptr",
            Kind::Interface => "interface",
            Kind::Struct => "struct",
            Kind::Slice => "slice",
            Kind::Array => "array",
            Kind::Map => "map",
            Kind::Func => "func",
            Kind::UnsafePointer => "unsafe.Pointer",
        }
    }

    /// Whether values of this kind are leaves carrying a literal.
    pub const fn is_scalar(self) -> bool {
        matches!(
            self,
            Kind::Bool
                | Kind::Int
                | Kind::Int8
                | Kind::Int16
                | Kind::Int32
                | Kind::Int64
                | Kind::Uint
                | Kind::Uint8
                | Kind::Uint16
                | Kind::Uint32
                | Kind::Uint64
                | Kind::Uintptr
                | Kind::Float32
                | Kind::Float64
                | Kind::String
        )
    }

    /// Whether values of this kind have address identity.
    pub const fn has_identity(self) -> bool {
        matches!(self, Kind::Pointer | Kind::Slice | Kind::Map)
    }

    /// Whether values of this kind can be nil.
    pub const fn is_nillable(self) -> bool {
        matches!(
            self,
            Kind::Pointer | Kind::Interface | Kind::Slice | Kind::Map | Kind::Func
        )
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
