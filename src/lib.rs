//! Purpose: Decode Hammer parser results into owned Rust token trees.
//! Exports: `api` (token model, parse sessions, engine boundary, scripted engine).
//! Role: Library crate; hosts call `api::parse` and never see engine memory.
//! Invariants: Every engine result is released exactly once, after decoding.
//! Invariants: Unsafe payload reads are confined to `core::payload`.
pub mod api;
mod core;
