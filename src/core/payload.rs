//! Purpose: Typed reads over the `HParsedToken` union payload region.
//! Exports: `Payload`.
//! Role: Union Reader; the single place where payload offset arithmetic happens.
//! Invariants: Readers never check the tag; `decode` dispatches before calling them.
//! Invariants: Every view returned borrows the token for `'t` and cannot outlive it.
//! Invariants: Loads are unaligned so the resolved offset carries no alignment assumption.
use std::marker::PhantomData;
use std::ptr;
use std::slice;

use crate::core::hammer::sys;
use crate::core::layout;

#[derive(Clone, Copy, Debug)]
pub struct Payload<'t> {
    base: *const u8,
    _token: PhantomData<&'t sys::HParsedToken>,
}

impl<'t> Payload<'t> {
    pub fn of(token: &'t sys::HParsedToken) -> Self {
        let start = token as *const sys::HParsedToken as *const u8;
        // The offset comes from `offsetof` on the same struct, so it stays in bounds.
        let base = unsafe { start.add(layout::union_offset()) };
        Self {
            base,
            _token: PhantomData,
        }
    }

    /// Borrowed `(pointer, length)` span. A null pointer yields an empty slice.
    ///
    /// # Safety
    /// The token must carry `TT_BYTES` and its span must stay valid for `'t`.
    pub unsafe fn bytes(&self) -> &'t [u8] {
        let span = unsafe { ptr::read_unaligned(self.base as *const sys::HBytes) };
        if span.token.is_null() || span.len == 0 {
            return &[];
        }
        unsafe { slice::from_raw_parts(span.token, span.len) }
    }

    /// # Safety
    /// The token must carry `TT_SINT`.
    pub unsafe fn sint(&self) -> i64 {
        unsafe { ptr::read_unaligned(self.base as *const i64) }
    }

    /// # Safety
    /// The token must carry `TT_UINT`.
    pub unsafe fn uint(&self) -> u64 {
        unsafe { ptr::read_unaligned(self.base as *const u64) }
    }

    /// The first `used` child pointers of the counted array; spare capacity is
    /// never exposed. Children may be null.
    ///
    /// # Safety
    /// The token must carry `TT_SEQUENCE` and the counted array must stay valid for `'t`.
    pub unsafe fn sequence(&self) -> &'t [*const sys::HParsedToken] {
        let array = unsafe { ptr::read_unaligned(self.base as *const *const sys::HCountedArray) };
        if array.is_null() {
            return &[];
        }
        let array = unsafe { &*array };
        if array.elements.is_null() || array.used == 0 {
            return &[];
        }
        unsafe {
            slice::from_raw_parts(
                array.elements as *const *const sys::HParsedToken,
                array.used,
            )
        }
    }
}
