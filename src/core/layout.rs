//! Purpose: Resolve where the `HParsedToken` union payload lives, once per process.
//! Exports: `union_offset`, `init`, `LayoutReport`, `layout_report`.
//! Role: Offset Resolver; the only source of the payload offset used by `payload`.
//! Invariants: The offset comes from the C compiler (`offsetof`), never from Rust guesses.
//! Invariants: Written once through `OnceLock`, read-only afterwards; no teardown.
//! Notes: A mismatch between the shim's headers and the linked engine is a build
//! configuration error. `layout_report` exists so tests and hosts can assert it.
use std::mem;
use std::sync::OnceLock;

use crate::core::hammer::sys;

static UNION_OFFSET: OnceLock<usize> = OnceLock::new();

/// Byte distance from the start of an `HParsedToken` to its union payload.
pub fn union_offset() -> usize {
    *UNION_OFFSET.get_or_init(|| {
        let offset = unsafe { sys::hammer_ast_token_union_offset() };
        tracing::trace!(offset, "resolved HParsedToken union offset");
        offset
    })
}

/// Resolve the offset eagerly, e.g. at startup before sessions run concurrently.
pub fn init() {
    let _ = union_offset();
}

/// C-side layout of `HParsedToken` next to the Rust mirror in `sys`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LayoutReport {
    pub c_union_offset: usize,
    pub c_index_offset: usize,
    pub c_bit_offset_offset: usize,
    pub c_size: usize,
    pub rust_union_offset: usize,
    pub rust_index_offset: usize,
    pub rust_bit_offset_offset: usize,
    pub rust_size: usize,
}

impl LayoutReport {
    pub fn is_consistent(&self) -> bool {
        self.c_union_offset == self.rust_union_offset
            && self.c_index_offset == self.rust_index_offset
            && self.c_bit_offset_offset == self.rust_bit_offset_offset
            && self.c_size == self.rust_size
    }
}

pub fn layout_report() -> LayoutReport {
    let (c_index_offset, c_bit_offset_offset, c_size) = unsafe {
        (
            sys::hammer_ast_token_index_offset(),
            sys::hammer_ast_token_bit_offset_offset(),
            sys::hammer_ast_token_size(),
        )
    };
    LayoutReport {
        c_union_offset: union_offset(),
        c_index_offset,
        c_bit_offset_offset,
        c_size,
        rust_union_offset: mem::offset_of!(sys::HParsedToken, data),
        rust_index_offset: mem::offset_of!(sys::HParsedToken, index),
        rust_bit_offset_offset: mem::offset_of!(sys::HParsedToken, bit_offset),
        rust_size: mem::size_of::<sys::HParsedToken>(),
    }
}
