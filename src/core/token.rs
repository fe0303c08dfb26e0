//! Purpose: Owned, host-native token trees produced by the decoder.
//! Exports: `Token`, `TokenValue`.
//! Role: Data model returned to callers; holds no pointers into engine memory.
//! Invariants: `Token::default()` is the zero-value token (None, offsets zero).
//! Invariants: Sequence order and length are exactly what the engine reported.
use std::fmt;

use bstr::BStr;
use serde::Serialize;

use crate::core::error::{Error, ErrorKind};

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TokenValue {
    #[default]
    None,
    Bytes(Vec<u8>),
    SignedInt(i64),
    UnsignedInt(u64),
    Sequence(Vec<Token>),
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Token {
    pub byte_offset: i64,
    pub bit_offset: i8,
    pub value: TokenValue,
}

impl Token {
    pub fn new(value: TokenValue) -> Self {
        Self {
            byte_offset: 0,
            bit_offset: 0,
            value,
        }
    }

    pub fn at(mut self, byte_offset: i64, bit_offset: i8) -> Self {
        self.byte_offset = byte_offset;
        self.bit_offset = bit_offset;
        self
    }

    pub fn is_none(&self) -> bool {
        matches!(self.value, TokenValue::None)
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match &self.value {
            TokenValue::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_sint(&self) -> Option<i64> {
        match self.value {
            TokenValue::SignedInt(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u64> {
        match self.value {
            TokenValue::UnsignedInt(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Token]> {
        match &self.value {
            TokenValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Nesting depth; a leaf (or an empty sequence) has depth 1.
    pub fn depth(&self) -> usize {
        match &self.value {
            TokenValue::Sequence(items) => {
                1 + items.iter().map(Token::depth).max().unwrap_or(0)
            }
            _ => 1,
        }
    }

    /// Number of tokens in the tree, this one included.
    pub fn count(&self) -> usize {
        match &self.value {
            TokenValue::Sequence(items) => 1 + items.iter().map(Token::count).sum::<usize>(),
            _ => 1,
        }
    }

    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string(self).map_err(|err| {
            Error::new(ErrorKind::Internal)
                .with_message("failed to serialize token")
                .with_source(err)
        })
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            TokenValue::None => f.write_str("none")?,
            TokenValue::Bytes(bytes) => write!(f, "{:?}", BStr::new(bytes))?,
            TokenValue::SignedInt(value) => write!(f, "{value}i")?,
            TokenValue::UnsignedInt(value) => write!(f, "{value}u")?,
            TokenValue::Sequence(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")?;
            }
        }
        write!(f, "@{}", self.byte_offset)?;
        if self.bit_offset != 0 {
            write!(f, ".{}", self.bit_offset)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Token, TokenValue};
    use serde_json::{Value, json};

    fn pair() -> Token {
        Token::new(TokenValue::Sequence(vec![
            Token::new(TokenValue::UnsignedInt(7)),
            Token::new(TokenValue::Bytes(b"ab".to_vec())).at(1, 0),
        ]))
    }

    #[test]
    fn default_is_zero_value() {
        let token = Token::default();
        assert!(token.is_none());
        assert_eq!(token.byte_offset, 0);
        assert_eq!(token.bit_offset, 0);
    }

    #[test]
    fn display_renders_compact_tree() {
        assert_eq!(pair().to_string(), r#"[7u@0, "ab"@1]@0"#);
        let shifted = Token::new(TokenValue::SignedInt(-3)).at(4, 5);
        assert_eq!(shifted.to_string(), "-3i@4.5");
    }

    #[test]
    fn accessors_match_variant() {
        let token = pair();
        let items = token.as_sequence().expect("sequence");
        assert_eq!(items[0].as_uint(), Some(7));
        assert_eq!(items[0].as_sint(), None);
        assert_eq!(items[1].as_bytes(), Some(&b"ab"[..]));
        assert_eq!(token.depth(), 2);
        assert_eq!(token.count(), 3);
    }

    #[test]
    fn json_uses_tagged_values() {
        let json = pair().to_json().expect("json");
        let value: Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(value["value"]["type"], "sequence");
        assert_eq!(
            value["value"]["value"][0]["value"],
            json!({"type": "unsigned_int", "value": 7})
        );
        assert_eq!(value["value"]["value"][1]["byte_offset"], 1);
        assert_eq!(value["value"]["value"][1]["value"]["value"], json!([97, 98]));
    }
}
