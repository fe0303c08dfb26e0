//! Purpose: Run one parse and return an owned token tree.
//! Exports: `parse`, `Session`, `SessionOptions`.
//! Role: Parse Session; pairs the engine call, decoding, and the single release.
//! Invariants: Decoding finishes before the result handle is released.
//! Invariants: A null result or null root is a no-match, never a zero-value success.
use crate::core::decode::Decoder;
use crate::core::engine::{Engine, ForeignResult};
use crate::core::error::{Error, ErrorKind, ParseFailed};
use crate::core::token::Token;

/// Parse `input` with `grammar` and decode the match with no depth limit.
pub fn parse<E: Engine + ?Sized>(
    engine: &E,
    grammar: &E::Grammar,
    input: &[u8],
) -> Result<Token, ParseFailed> {
    Session::new(engine)
        .parse(grammar, input)
        .map_err(|_| ParseFailed)
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SessionOptions {
    pub max_depth: Option<usize>,
}

impl SessionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

/// Parses against one engine with fixed decode options. Cheap to create;
/// holds no per-parse state, so one session can serve many threads when the
/// engine allows it.
#[derive(Debug)]
pub struct Session<'e, E: Engine + ?Sized> {
    engine: &'e E,
    decoder: Decoder,
}

impl<'e, E: Engine + ?Sized> Session<'e, E> {
    pub fn new(engine: &'e E) -> Self {
        Self::with_options(engine, SessionOptions::default())
    }

    pub fn with_options(engine: &'e E, options: SessionOptions) -> Self {
        let decoder = match options.max_depth {
            Some(max_depth) => Decoder::new().with_max_depth(max_depth),
            None => Decoder::new(),
        };
        Self { engine, decoder }
    }

    pub fn options(&self) -> SessionOptions {
        SessionOptions {
            max_depth: self.decoder.max_depth(),
        }
    }

    pub fn parse(&self, grammar: &E::Grammar, input: &[u8]) -> Result<Token, Error> {
        let result = ForeignResult::acquire(self.engine, grammar, input);
        let outcome = match result.root() {
            None => Err(Error::new(ErrorKind::NoMatch).with_message("engine produced no match")),
            Some(root) => unsafe { self.decoder.decode(root) },
        };
        drop(result);

        match &outcome {
            Ok(token) => tracing::trace!(
                input_len = input.len(),
                tokens = token.count(),
                "parse matched"
            ),
            Err(err) => tracing::trace!(input_len = input.len(), error = %err, "parse failed"),
        }
        outcome
    }
}
