// Raw FFI mirrors of the Hammer token structures plus the layout shim.
use libc::size_t;
use std::os::raw::{c_char, c_uint, c_void};

pub type HTokenType = c_uint;

pub const TT_INVALID: HTokenType = 0;
pub const TT_NONE: HTokenType = 1;
pub const TT_BYTES: HTokenType = 2;
pub const TT_SINT: HTokenType = 4;
pub const TT_UINT: HTokenType = 8;
pub const TT_DOUBLE: HTokenType = 12;
pub const TT_FLOAT: HTokenType = 13;
pub const TT_SEQUENCE: HTokenType = 16;
pub const TT_ERR: HTokenType = 32;
pub const TT_USER: HTokenType = 64;

#[repr(C)]
pub struct HArena {
    _private: [u8; 0],
}

#[repr(C)]
pub struct HParser {
    _private: [u8; 0],
}

#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct HBytes {
    pub token: *const u8,
    pub len: size_t,
}

#[repr(C)]
#[derive(Debug)]
pub struct HCountedArray {
    pub capacity: size_t,
    pub used: size_t,
    pub arena: *mut HArena,
    pub elements: *mut *mut HParsedToken,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub union HTokenData {
    pub bytes: HBytes,
    pub sint: i64,
    pub uint: u64,
    pub dbl: f64,
    pub flt: f32,
    pub seq: *mut HCountedArray,
    pub user: *mut c_void,
}

#[repr(C)]
pub struct HParsedToken {
    pub token_type: HTokenType,
    pub data: HTokenData,
    pub index: size_t,
    pub bit_length: size_t,
    pub bit_offset: c_char,
}

#[repr(C)]
pub struct HParseResult {
    pub ast: *const HParsedToken,
    pub bit_length: i64,
    pub arena: *mut HArena,
}

unsafe extern "C" {
    pub fn hammer_ast_token_union_offset() -> size_t;

    pub fn hammer_ast_token_index_offset() -> size_t;

    pub fn hammer_ast_token_bit_offset_offset() -> size_t;

    pub fn hammer_ast_token_size() -> size_t;
}

#[cfg(feature = "link-hammer")]
unsafe extern "C" {
    pub fn h_parse(parser: *const HParser, input: *const u8, length: size_t) -> *mut HParseResult;

    pub fn h_parse_result_free(result: *mut HParseResult);
}
