//! Stack growth for deep recursion.
//!
//! The parser, the lowering pass and the evaluator all recurse once per
//! nesting level of the script. Scripts nested deeply enough (long operator
//! chains, recursive script functions) would overflow the native stack, so
//! every recursive entry point goes through [`ensure_sufficient_stack`].
//!
//! On native targets the stack is grown on demand with `stacker`. On WASM
//! the closure is called directly.

/// Grow when less than this much stack remains.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment.
const STACK_PER_RECURSION: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if the remaining space is below the
/// red zone.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
