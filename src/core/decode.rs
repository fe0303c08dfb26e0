//! Purpose: Convert an engine-owned `HParsedToken` tree into an owned `Token` tree.
//! Exports: `decode`, `Decoder`.
//! Role: Token Decoder; tag dispatch lives here, payload reads go through `payload`.
//! Invariants: Pure walk; never mutates, retains or frees engine memory.
//! Invariants: Null handles decode to `Token::default()`, also inside sequences.
//! Invariants: Tags other than none/bytes/sint/uint/sequence decode to `TokenValue::None`.
use crate::core::error::{Error, ErrorKind};
use crate::core::hammer::sys;
use crate::core::payload::Payload;
use crate::core::token::{Token, TokenValue};

/// Decode the tree rooted at `token` with no depth limit.
///
/// # Safety
/// `token` must be null or point to a well-formed engine token whose result
/// handle has not been released for the duration of the call.
pub unsafe fn decode(token: *const sys::HParsedToken) -> Token {
    // Without a depth limit the walk has no failure path.
    unsafe { Decoder::new().decode(token) }.unwrap_or_default()
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Decoder {
    max_depth: Option<usize>,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject trees nested deeper than `max_depth` (the root is depth 1).
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// # Safety
    /// Same contract as [`decode`].
    pub unsafe fn decode(&self, token: *const sys::HParsedToken) -> Result<Token, Error> {
        unsafe { self.decode_at(token, 1) }
    }

    unsafe fn decode_at(&self, token: *const sys::HParsedToken, depth: usize) -> Result<Token, Error> {
        if let Some(max_depth) = self.max_depth {
            if depth > max_depth {
                return Err(Error::new(ErrorKind::DepthLimit)
                    .with_message("token tree exceeds max depth")
                    .with_depth(max_depth));
            }
        }

        let Some(token) = (unsafe { token.as_ref() }) else {
            return Ok(Token::default());
        };

        let payload = Payload::of(token);
        let value = match token.token_type {
            sys::TT_NONE => TokenValue::None,
            sys::TT_BYTES => TokenValue::Bytes(unsafe { payload.bytes() }.to_vec()),
            sys::TT_SINT => TokenValue::SignedInt(unsafe { payload.sint() }),
            sys::TT_UINT => TokenValue::UnsignedInt(unsafe { payload.uint() }),
            sys::TT_SEQUENCE => {
                let children = unsafe { payload.sequence() };
                let mut items = Vec::with_capacity(children.len());
                for &child in children {
                    items.push(unsafe { self.decode_at(child, depth + 1) }?);
                }
                TokenValue::Sequence(items)
            }
            tag => {
                tracing::debug!(
                    tag,
                    byte_offset = token.index,
                    "unsupported token type decoded as none"
                );
                TokenValue::None
            }
        };

        Ok(Token {
            byte_offset: token.index as i64,
            bit_offset: token.bit_offset as i8,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Decoder, decode};
    use crate::core::error::ErrorKind;
    use crate::core::hammer::sys;
    use crate::core::scripted::{ForeignTree, Node};
    use crate::core::token::{Token, TokenValue};
    use std::ptr;

    #[test]
    fn null_handle_is_zero_value() {
        assert_eq!(unsafe { decode(ptr::null()) }, Token::default());
    }

    #[test]
    fn scalar_tags_keep_offsets() {
        let tree = ForeignTree::build(&Node::sint(-9).at(12, 3));
        let token = unsafe { decode(tree.root()) };
        assert_eq!(token, Token::new(TokenValue::SignedInt(-9)).at(12, 3));
    }

    #[test]
    fn unknown_tags_degrade_to_none_without_dropping_siblings() {
        let tree = ForeignTree::build(&Node::sequence([
            Node::raw_tag(sys::TT_DOUBLE).at(0, 0),
            Node::uint(5).at(8, 0),
            Node::raw_tag(0xdead_beef).at(9, 0),
        ]));
        let token = unsafe { decode(tree.root()) };
        let items = token.as_sequence().expect("sequence");
        assert_eq!(items.len(), 3);
        assert!(items[0].is_none());
        assert_eq!(items[1].as_uint(), Some(5));
        assert!(items[2].is_none());
        assert_eq!(items[2].byte_offset, 9);
    }

    #[test]
    fn depth_limit_counts_root_as_one() {
        let tree = ForeignTree::build(&Node::sequence([Node::sequence([Node::none()])]));
        let decoder = Decoder::new().with_max_depth(3);
        let token = unsafe { decoder.decode(tree.root()) }.expect("within limit");
        assert_eq!(token.depth(), 3);

        let err = unsafe { Decoder::new().with_max_depth(2).decode(tree.root()) }
            .expect_err("too deep");
        assert_eq!(err.kind(), ErrorKind::DepthLimit);
        assert_eq!(err.depth(), Some(2));
    }
}
