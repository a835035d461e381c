//! Stack growth for deeply nested values.
//!
//! Marshaling and rendering recurse once per nesting level. A long linked
//! list is thousands of levels deep, so recursive calls go through
//! [`ensure_sufficient_stack`], which grows the stack on native targets and
//! is a passthrough on WASM.

/// Grow when less than this much stack remains.
const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// wasm32 cannot switch stacks; `f` runs on the current one.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
