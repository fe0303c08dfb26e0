//! Purpose: Define the stable public Rust API boundary for hammer-ast.
//! Exports: Token model, parse entry points, engine boundary, scripted engine.
//! Role: Public, additive-only surface; hides internal payload/offset modules.
//! Invariants: This module is the only public path to core items.
//! Invariants: Raw layout mirrors are exposed only through `sys`.

pub use crate::core::decode::{Decoder, decode};
pub use crate::core::engine::{Engine, ForeignResult};
pub use crate::core::error::{Error, ErrorKind, ParseFailed};
#[cfg(feature = "link-hammer")]
pub use crate::core::hammer::{Grammar, HammerEngine};
pub use crate::core::hammer::sys;
pub use crate::core::layout::{LayoutReport, init as init_layout, layout_report, union_offset};
pub use crate::core::scripted::{ForeignTree, Node, Reply, ScriptedEngine, ScriptedGrammar};
pub use crate::core::session::{Session, SessionOptions, parse};
pub use crate::core::token::{Token, TokenValue};
