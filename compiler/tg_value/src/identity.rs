//! Address identity of reference-semantics values.

/// Identity of a non-nil pointer, slice, or map.
///
/// Two values with equal identity observe the same storage: pointers share a
/// cell, maps share an entry table, and slices share backing storage over the
/// same window. Slices over different windows of one array are distinct.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Identity {
    Pointer(usize),
    Slice {
        storage: usize,
        offset: usize,
        len: usize,
    },
    Map(usize),
}
