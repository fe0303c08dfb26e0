//! Purpose: Bindings to the Hammer parsing engine.
//! Exports: `sys` (raw layout mirrors), and with `link-hammer`: `HammerEngine`, `Grammar`.
//! Role: The real `Engine` implementation; grammar construction stays with the caller.
//! Invariants: All raw engine calls are confined to this module + `sys`.
pub mod sys;

#[cfg(feature = "link-hammer")]
pub use linked::{Grammar, HammerEngine};

#[cfg(feature = "link-hammer")]
mod linked {
    use std::ptr::NonNull;

    use super::sys;
    use crate::core::engine::Engine;

    /// A compiled Hammer parser built outside this crate.
    #[derive(Debug)]
    pub struct Grammar {
        parser: NonNull<sys::HParser>,
    }

    impl Grammar {
        /// Adopt a compiled `HParser*`. Returns `None` for null.
        ///
        /// # Safety
        /// `parser` must be a compiled Hammer parser that outlives the returned
        /// `Grammar`; this crate never frees it.
        pub unsafe fn from_raw(parser: *const sys::HParser) -> Option<Self> {
            NonNull::new(parser as *mut sys::HParser).map(|parser| Self { parser })
        }

        pub fn as_ptr(&self) -> *const sys::HParser {
            self.parser.as_ptr()
        }
    }

    #[derive(Clone, Copy, Debug, Default)]
    pub struct HammerEngine;

    unsafe impl Engine for HammerEngine {
        type Grammar = Grammar;

        fn run_parse(&self, grammar: &Grammar, input: &[u8]) -> *mut sys::HParseResult {
            unsafe { sys::h_parse(grammar.as_ptr(), input.as_ptr(), input.len()) }
        }

        unsafe fn release_result(&self, result: *mut sys::HParseResult) {
            if result.is_null() {
                return;
            }
            unsafe { sys::h_parse_result_free(result) };
        }
    }
}
