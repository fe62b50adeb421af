//! Stack headroom for the recursive passes.
//!
//! Parsing, resolution and evaluation all recurse once per nesting level of
//! the program, and a Lox call adds several host frames on top of that.
//! [`ensure_sufficient_stack`] grows the host stack on demand through
//! `stacker`, so deep (but valid) programs never overflow it.

/// Runs `f`, first moving to a fresh stack segment if less than the red
/// zone is left on the current one.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    /// Minimum stack space to keep available (128KB red zone).
    const RED_ZONE: usize = 128 * 1024;

    /// Size of each newly allocated segment (1MB).
    const STACK_PER_RECURSION: usize = 1024 * 1024;

    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack; call straight through.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
