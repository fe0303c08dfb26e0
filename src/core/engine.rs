//! Purpose: Boundary with the external parsing engine and scoped ownership of its results.
//! Exports: `Engine`, `ForeignResult`.
//! Role: Everything that touches a result handle's lifetime goes through `ForeignResult`.
//! Invariants: One `run_parse` call is paired with exactly one `release_result` call,
//! on every exit path including unwinding.
//! Invariants: Borrowed roots cannot outlive the guard that releases them.
use crate::core::hammer::sys;

/// A parsing engine that hands out foreign result trees.
///
/// # Safety
/// Implementors guarantee that a non-null handle returned by `run_parse`
/// points to an `HParseResult` whose `ast` is null or a well-formed token tree
/// (see `sys`), and that the whole tree stays valid and unmodified until that
/// handle is passed to `release_result`.
pub unsafe trait Engine {
    type Grammar: ?Sized;

    fn run_parse(&self, grammar: &Self::Grammar, input: &[u8]) -> *mut sys::HParseResult;

    /// Release one handle returned by `run_parse`. Called exactly once per
    /// `run_parse`, also when the handle is null.
    ///
    /// # Safety
    /// `result` must come from this engine's `run_parse` and must not have been
    /// released before.
    unsafe fn release_result(&self, result: *mut sys::HParseResult);
}

/// Exclusive owner of one engine result handle; releases it on drop.
pub struct ForeignResult<'e, E: Engine + ?Sized> {
    engine: &'e E,
    result: *mut sys::HParseResult,
}

impl<'e, E: Engine + ?Sized> ForeignResult<'e, E> {
    pub fn acquire(engine: &'e E, grammar: &E::Grammar, input: &[u8]) -> Self {
        let result = engine.run_parse(grammar, input);
        Self { engine, result }
    }

    pub fn is_null(&self) -> bool {
        self.result.is_null()
    }

    /// Root token of the result, or `None` when the engine reported no match.
    pub fn root(&self) -> Option<&sys::HParsedToken> {
        if self.result.is_null() {
            return None;
        }
        unsafe { (*self.result).ast.as_ref() }
    }

    /// Bits of input the engine consumed, when a result exists.
    pub fn bit_length(&self) -> Option<i64> {
        if self.result.is_null() {
            return None;
        }
        Some(unsafe { (*self.result).bit_length })
    }
}

impl<E: Engine + ?Sized> Drop for ForeignResult<'_, E> {
    fn drop(&mut self) {
        unsafe { self.engine.release_result(self.result) };
    }
}
