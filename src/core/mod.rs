// Core modules: engine layout, payload reads, decoding, sessions and errors.
pub mod decode;
pub mod engine;
pub mod error;
pub mod hammer;
pub mod layout;
pub mod payload;
pub mod scripted;
pub mod session;
pub mod token;
